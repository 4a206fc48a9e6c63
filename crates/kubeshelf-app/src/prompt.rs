use std::io::{self, BufRead, Write};

use kubeshelf_core::{Choice, Selector};

/// Numbered-list picker over any line reader and writer (stdin and stderr in
/// the binary).
pub struct PromptSelector<R, W> {
    input: R,
    output: W,
}

impl PromptSelector<io::BufReader<io::Stdin>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self, prompt: &str) -> Option<String> {
        let _ = write!(self.output, "{prompt} ");
        let _ = self.output.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn list(&mut self, prompt: &str, items: &[String]) {
        let _ = writeln!(self.output, "{prompt}");
        for (idx, item) in items.iter().enumerate() {
            let _ = writeln!(self.output, "  {:>2}) {item}", idx + 1);
        }
    }
}

/// Resolves a token to an item, by 1-based number or exact text.
fn resolve<'a>(token: &str, items: &'a [String]) -> Option<&'a String> {
    if let Ok(n) = token.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| items.get(i));
    }
    items.iter().find(|item| item.as_str() == token)
}

impl<R: BufRead, W: Write> Selector for PromptSelector<R, W> {
    fn pick_one(&mut self, prompt: &str, items: &[String]) -> Choice<String> {
        if items.is_empty() {
            return Choice::Nothing;
        }
        self.list(prompt, items);
        match self.read_answer(">") {
            Some(answer) => resolve(&answer, items).cloned().map_or(Choice::Nothing, Choice::Chosen),
            None => Choice::Nothing,
        }
    }

    fn pick_many(&mut self, prompt: &str, items: &[String]) -> Choice<Vec<String>> {
        if items.is_empty() {
            return Choice::Nothing;
        }
        self.list(prompt, items);
        let Some(answer) = self.read_answer("(numbers or names, separated by spaces or commas) >") else {
            return Choice::Nothing;
        };
        let mut picked: Vec<String> = Vec::new();
        for token in answer.split([',', ' ']).filter(|t| !t.is_empty()) {
            if let Some(item) = resolve(token, items) {
                if !picked.contains(item) {
                    picked.push(item.clone());
                }
            }
        }
        if picked.is_empty() {
            Choice::Nothing
        } else {
            Choice::Chosen(picked)
        }
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        matches!(self.read_answer(&format!("{prompt} [y/N]")).as_deref(), Some("y" | "Y" | "yes" | "YES" | "Yes"))
    }

    fn ask(&mut self, prompt: &str, default: &str) -> String {
        match self.read_answer(&format!("{prompt}:")) {
            Some(answer) if !answer.is_empty() => answer,
            _ => default.to_string(),
        }
    }
}
