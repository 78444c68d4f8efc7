//! Load-option tokenizer
//!
//! The shell hands an application its command line as UCS-2 in the
//! loaded image's load options, image path first. Tokens split on
//! whitespace; double quotes group and are dropped.

use core::fmt;

/// Maximum tokens kept, image path included
pub const MAX_ARGS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdlineError {
    TooManyArgs,
    /// Decoded command line did not fit the scratch buffer
    TooLong { needed: usize },
    UnterminatedQuote,
}

impl fmt::Display for CmdlineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyArgs => write!(f, "Too many arguments (max {})", MAX_ARGS - 1),
            Self::TooLong { needed } => write!(f, "Command line too long ({} bytes)", needed),
            Self::UnterminatedQuote => write!(f, "Unterminated quote in command line"),
        }
    }
}

/// Tokenized command line borrowing from a scratch buffer.
pub struct CommandLine<'a> {
    tokens: [&'a str; MAX_ARGS],
    len: usize,
}

impl<'a> CommandLine<'a> {
    /// Tokenize `options` (stops at the first NUL) into `scratch`.
    ///
    /// Non-ASCII units are replaced by `?`.
    pub fn parse(options: &[u16], scratch: &'a mut [u8]) -> Result<Self, CmdlineError> {
        let mut spans = [(0usize, 0usize); MAX_ARGS];
        let mut count = 0;
        let mut write = 0;
        let mut start: Option<usize> = None;
        let mut quoted = false;

        let units = options.iter().copied().take_while(|&u| u != 0);
        for unit in units {
            let byte = if unit < 0x80 { unit as u8 } else { b'?' };

            if byte == b'"' {
                quoted = !quoted;
                if start.is_none() {
                    start = Some(write);
                }
                continue;
            }

            if byte.is_ascii_whitespace() && !quoted {
                if let Some(s) = start.take() {
                    *spans.get_mut(count).ok_or(CmdlineError::TooManyArgs)? = (s, write);
                    count += 1;
                }
                continue;
            }

            let slot = scratch
                .get_mut(write)
                .ok_or(CmdlineError::TooLong { needed: write + 1 })?;
            *slot = byte;
            if start.is_none() {
                start = Some(write);
            }
            write += 1;
        }

        if quoted {
            return Err(CmdlineError::UnterminatedQuote);
        }
        if let Some(s) = start {
            *spans.get_mut(count).ok_or(CmdlineError::TooManyArgs)? = (s, write);
            count += 1;
        }

        let scratch: &'a [u8] = scratch;
        let mut tokens = [""; MAX_ARGS];
        for (token, &(s, e)) in tokens.iter_mut().zip(&spans[..count]) {
            // Only ASCII was written
            *token = core::str::from_utf8(&scratch[s..e]).unwrap_or("");
        }

        Ok(Self { tokens, len: count })
    }

    pub fn tokens(&self) -> &[&'a str] {
        &self.tokens[..self.len]
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pick the command to run and its arguments.
    ///
    /// The image name (path and `.efi` stripped) wins when `is_command`
    /// accepts it; otherwise the first argument names the command.
    pub fn select<P>(&self, is_command: P) -> Option<(&'a str, &[&'a str])>
    where
        P: Fn(&str) -> bool,
    {
        let tokens = self.tokens();
        let image = image_stem(tokens.first()?);
        if is_command(image) {
            return Some((image, &tokens[1..]));
        }
        let command = *tokens.get(1)?;
        Some((command, &tokens[2..]))
    }
}

/// `\EFI\Tools\setup_var.efi` -> `setup_var`
pub fn image_stem(path: &str) -> &str {
    let base = path.rsplit(['\\', '/']).next().unwrap_or(path);
    match base.len().checked_sub(4) {
        Some(cut) if base.is_char_boundary(cut) && base[cut..].eq_ignore_ascii_case(".efi") => {
            &base[..cut]
        }
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    fn wide(s: &str) -> Vec<u16> {
        let mut v: Vec<u16> = s.encode_utf16().collect();
        v.push(0);
        v
    }

    fn is_known(name: &str) -> bool {
        name == "setup_var" || name == "lsefivar"
    }

    #[test]
    fn test_split_on_whitespace() {
        let options = wide("setup_var.efi  IH2O\t10 2a");
        let mut scratch = [0u8; 64];
        let line = CommandLine::parse(&options, &mut scratch).unwrap();
        assert_eq!(line.tokens(), ["setup_var.efi", "IH2O", "10", "2a"]);
    }

    #[test]
    fn test_quotes_group() {
        let options = wide("fs0:\\setup_var.efi \"Setup Var\" 3");
        let mut scratch = [0u8; 64];
        let line = CommandLine::parse(&options, &mut scratch).unwrap();
        assert_eq!(line.tokens(), ["fs0:\\setup_var.efi", "Setup Var", "3"]);
    }

    #[test]
    fn test_empty_quotes_make_empty_token() {
        let options = wide("a \"\" b");
        let mut scratch = [0u8; 16];
        let line = CommandLine::parse(&options, &mut scratch).unwrap();
        assert_eq!(line.tokens(), ["a", "", "b"]);
    }

    #[test]
    fn test_stops_at_nul() {
        let mut options = wide("lsefivar");
        options.extend(wide(" junk"));
        let mut scratch = [0u8; 16];
        let line = CommandLine::parse(&options, &mut scratch).unwrap();
        assert_eq!(line.tokens(), ["lsefivar"]);
    }

    #[test]
    fn test_limits() {
        let mut scratch = [0u8; 4];
        assert_eq!(
            CommandLine::parse(&wide("abcdef"), &mut scratch).err(),
            Some(CmdlineError::TooLong { needed: 5 })
        );

        let mut scratch = [0u8; 64];
        assert_eq!(
            CommandLine::parse(&wide("a b c d e f g h i"), &mut scratch).err(),
            Some(CmdlineError::TooManyArgs)
        );
        assert_eq!(
            CommandLine::parse(&wide("a \"b"), &mut scratch).err(),
            Some(CmdlineError::UnterminatedQuote)
        );
    }

    #[test]
    fn test_image_stem() {
        assert_eq!(image_stem("\\EFI\\Tools\\setup_var.efi"), "setup_var");
        assert_eq!(image_stem("fs0:/lsefivar.EFI"), "lsefivar");
        assert_eq!(image_stem("shell"), "shell");
        assert_eq!(image_stem(".efi"), "");
    }

    #[test]
    fn test_select_by_image_name() {
        let options = wide("\\EFI\\setup_var.efi IH2O 10");
        let mut scratch = [0u8; 64];
        let line = CommandLine::parse(&options, &mut scratch).unwrap();
        let (command, args) = line.select(is_known).unwrap();
        assert_eq!(command, "setup_var");
        assert_eq!(args, ["IH2O", "10"]);
    }

    #[test]
    fn test_select_by_first_argument() {
        let options = wide("tools.efi lsefivar");
        let mut scratch = [0u8; 64];
        let line = CommandLine::parse(&options, &mut scratch).unwrap();
        let (command, args) = line.select(is_known).unwrap();
        assert_eq!(command, "lsefivar");
        assert!(args.is_empty());

        let options = wide("tools.efi");
        let line = CommandLine::parse(&options, &mut scratch).unwrap();
        assert!(line.select(is_known).is_none());
    }
}
