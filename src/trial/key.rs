/// A discrete key event, already reduced to the capture alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// One of the 26 lower-case letters
    Letter(char),
    /// Annotation digit `1`-`4`
    Digit(char),
    /// Remove the last character
    Backspace,
    /// Punctuation substitute, appends a literal `?`
    QuestionMark,
    /// Enter/return: replay the stimulus, text unchanged
    Replay,
    /// Finish the trial with the current text
    Advance,
    /// Anything outside the alphabet
    Ignored,
}

impl Key {
    /// Classify a typed character
    pub fn from_char(c: char) -> Self {
        match c {
            'a'..='z' => Key::Letter(c),
            'A'..='Z' => Key::Letter(c.to_ascii_lowercase()),
            '1'..='4' => Key::Digit(c),
            '/' | '?' => Key::QuestionMark,
            _ => Key::Ignored,
        }
    }

    /// Character this key appends to the transcription, if any
    pub fn appended_char(self) -> Option<char> {
        match self {
            Key::Letter(c) | Key::Digit(c) => Some(c),
            Key::QuestionMark => Some('?'),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_are_lowercased() {
        assert_eq!(Key::from_char('q'), Key::Letter('q'));
        assert_eq!(Key::from_char('Q'), Key::Letter('q'));
    }

    #[test]
    fn test_digit_range() {
        assert_eq!(Key::from_char('1'), Key::Digit('1'));
        assert_eq!(Key::from_char('4'), Key::Digit('4'));
        assert_eq!(Key::from_char('5'), Key::Ignored);
        assert_eq!(Key::from_char('0'), Key::Ignored);
    }

    #[test]
    fn test_slash_is_question_mark() {
        assert_eq!(Key::from_char('/'), Key::QuestionMark);
        assert_eq!(Key::QuestionMark.appended_char(), Some('?'));
    }

    #[test]
    fn test_outside_alphabet() {
        for c in [' ', '.', ',', 'é', '\t'] {
            assert_eq!(Key::from_char(c), Key::Ignored, "{:?}", c);
        }
        assert_eq!(Key::Replay.appended_char(), None);
        assert_eq!(Key::Advance.appended_char(), None);
    }
}
