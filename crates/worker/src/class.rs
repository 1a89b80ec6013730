/// Execution classes used for fetch scheduling and observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Work triggered directly by the local user (tapping a sticker, sending a reaction).
	Interactive,
	/// Work triggered by remote activity that can wait.
	Background,
}

impl TaskClass {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Interactive => "interactive",
			Self::Background => "background",
		}
	}
}
