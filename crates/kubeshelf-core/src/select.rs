/// Result of asking the operator to pick something. `Nothing` means the
/// operator chose nothing, which is different from choosing an empty set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice<T> {
    Chosen(T),
    Nothing,
}

impl<T> Choice<T> {
    pub fn chosen(self) -> Option<T> {
        match self {
            Self::Chosen(v) => Some(v),
            Self::Nothing => None,
        }
    }
}

/// Interactive picker. Implementations own their terminal handling.
pub trait Selector {
    fn pick_one(&mut self, prompt: &str, items: &[String]) -> Choice<String>;

    fn pick_many(&mut self, prompt: &str, items: &[String]) -> Choice<Vec<String>>;

    fn confirm(&mut self, prompt: &str) -> bool;

    /// Free-text answer; `default` when the operator enters nothing.
    fn ask(&mut self, prompt: &str, default: &str) -> String;
}

/// Never prompts: nothing is picked, nothing confirmed, defaults accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractive;

impl Selector for NonInteractive {
    fn pick_one(&mut self, _prompt: &str, _items: &[String]) -> Choice<String> {
        Choice::Nothing
    }

    fn pick_many(&mut self, _prompt: &str, _items: &[String]) -> Choice<Vec<String>> {
        Choice::Nothing
    }

    fn confirm(&mut self, _prompt: &str) -> bool {
        false
    }

    fn ask(&mut self, _prompt: &str, default: &str) -> String {
        default.to_string()
    }
}
