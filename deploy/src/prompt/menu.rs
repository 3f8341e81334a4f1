//! Closed-choice parsing for menus and yes/no questions

/// Answer to a yes/no question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    /// Accepts y/yes/n/no in any case; anything else is `None`
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Some(YesNo::Yes),
            "n" | "no" => Some(YesNo::No),
            _ => None,
        }
    }
}

impl From<YesNo> for bool {
    fn from(choice: YesNo) -> Self {
        choice == YesNo::Yes
    }
}

/// Parse a one-based menu number into a zero-based index
pub fn parse_menu_choice(input: &str, option_count: usize) -> Option<usize> {
    let number: usize = input.trim().parse().ok()?;
    (1..=option_count).contains(&number).then(|| number - 1)
}

pub fn render_menu(title: &str, options: &[&str]) -> String {
    let mut out = String::from(title);
    for (i, option) in options.iter().enumerate() {
        out.push_str(&format!("\n  {}) {}", i + 1, option));
    }
    out
}
