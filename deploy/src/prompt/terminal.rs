//! Terminal prompter backed by dialoguer

use dialoguer::{Input, Password, theme::ColorfulTheme};
use std::io::{self, Read};

use super::Prompter;
use crate::error::Result;

/// Prompter used by the installer binary
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn line(&mut self, prompt: &str) -> Result<String> {
        clear_input_buffer();
        let input: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(input)
    }

    fn secret(&mut self, prompt: &str) -> Result<String> {
        clear_input_buffer();
        let input = Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?;
        Ok(input)
    }

    fn say(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Drain pending keystrokes so a fast key press does not answer the next prompt
pub fn clear_input_buffer() {
    #[cfg(unix)]
    {
        use std::os::unix::io::AsRawFd;

        let stdin_fd = io::stdin().as_raw_fd();

        let flags = unsafe { libc::fcntl(stdin_fd, libc::F_GETFL) };
        if flags != -1 {
            unsafe { libc::fcntl(stdin_fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };

            let mut buffer = [0u8; 1024];
            let mut stdin = io::stdin();
            // Stops on WouldBlock as well as on EOF
            while let Ok(n) = stdin.read(&mut buffer) {
                if n == 0 {
                    break;
                }
            }

            unsafe { libc::fcntl(stdin_fd, libc::F_SETFL, flags) };
        }
    }

    #[cfg(not(unix))]
    {
        std::thread::sleep(std::time::Duration::from_millis(50));
    }
}
