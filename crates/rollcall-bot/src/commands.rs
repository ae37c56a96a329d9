//! Chat commands: `/start`, `/help`, `/who`.

/// A recognised bot command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Greeting and usage.
    Start,
    Help,
    /// Who has not reported yet in the current cycle.
    Who,
}

impl Command {
    /// Parse the leading `/command` or `/command@bot` token.
    ///
    /// A command addressed to another bot (`/who@other_bot`) is ignored when
    /// our username is known.
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let token = text.split_whitespace().next()?.strip_prefix('/')?;
        let (name, target) = match token.split_once('@') {
            Some((name, target)) => (name, Some(target)),
            None => (token, None),
        };
        if let (Some(target), Some(me)) = (target, bot_username)
            && !target.eq_ignore_ascii_case(me)
        {
            return None;
        }

        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            "who" => Some(Self::Who),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        assert_eq!(Command::parse("/start", None), Some(Command::Start));
        assert_eq!(Command::parse("/help", None), Some(Command::Help));
        assert_eq!(Command::parse("  /who please", None), Some(Command::Who));
    }

    #[test]
    fn test_parse_addressed() {
        assert_eq!(Command::parse("/who@rollcall_bot", Some("rollcall_bot")), Some(Command::Who));
        assert_eq!(Command::parse("/who@other_bot", Some("rollcall_bot")), None);
        assert_eq!(Command::parse("/who@anything", None), Some(Command::Who));
    }

    #[test]
    fn test_not_commands() {
        assert_eq!(Command::parse("who", None), None);
        assert_eq!(Command::parse("/unknown", None), None);
        assert_eq!(Command::parse("", None), None);
        assert_eq!(Command::parse("done #report /who", None), None);
    }
}
