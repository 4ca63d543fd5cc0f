use std::fmt;

/// Маркер отпускания касания в выводе libinput
pub const TOUCH_UP_MARKER: &str = "TOUCH_UP";

/// Маркер числа касаний указателя; за ним следует счётчик
pub const POINTER_TOUCH_MARKER: &str = "POINTER_TOUCH";

/// Классификация строки события
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TouchReleased,
    Other,
}

impl EventKind {
    pub fn is_touch_released(self) -> bool {
        self == EventKind::TouchReleased
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::TouchReleased => write!(f, "TouchReleased"),
            EventKind::Other => write!(f, "Other"),
        }
    }
}

/// Классифицировать строку: достаточно любого из двух маркеров
pub fn classify(line: &str) -> EventKind {
    if is_touch_up(line) || is_pointer_touch_released(line) {
        EventKind::TouchReleased
    } else {
        EventKind::Other
    }
}

pub fn is_touch_up(line: &str) -> bool {
    line.contains(TOUCH_UP_MARKER)
}

/// `POINTER_TOUCH`, затем пробельные символы, затем отдельный токен `0`.
///
/// Начало маркера не привязано к границе слова: `XPOINTER_TOUCH 0` тоже совпадает.
pub fn is_pointer_touch_released(line: &str) -> bool {
    line.match_indices(POINTER_TOUCH_MARKER).any(|(start, marker)| {
        let rest = &line[start + marker.len()..];
        let count = rest.trim_start();

        // Нужен хотя бы один пробельный символ между маркером и счётчиком
        if count.len() == rest.len() {
            return false;
        }

        match count.strip_prefix('0') {
            Some(tail) => !tail.chars().next().is_some_and(is_word_char),
            None => false,
        }
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_up_lines() {
        assert_eq!(classify("TOUCH_UP"), EventKind::TouchReleased);
        assert_eq!(
            classify(" event5   TOUCH_UP                +3.412s\t0 (0)"),
            EventKind::TouchReleased
        );
    }

    #[test]
    fn test_pointer_touch_count() {
        assert_eq!(classify("POINTER_TOUCH 0"), EventKind::TouchReleased);
        assert_eq!(classify("POINTER_TOUCH 2"), EventKind::Other);
        assert_eq!(classify("POINTER_TOUCH\t\t0 fingers"), EventKind::TouchReleased);
    }

    #[test]
    fn test_pointer_touch_requires_separate_zero_token() {
        assert!(!is_pointer_touch_released("POINTER_TOUCH0"));
        assert!(!is_pointer_touch_released("POINTER_TOUCH 05"));
        assert!(!is_pointer_touch_released("POINTER_TOUCH 0_"));
        assert!(!is_pointer_touch_released("POINTER_TOUCH "));
        assert!(is_pointer_touch_released("POINTER_TOUCH 0.5"));
    }

    #[test]
    fn test_pointer_touch_later_occurrence() {
        assert!(is_pointer_touch_released("POINTER_TOUCH 1 POINTER_TOUCH 0"));
    }

    #[test]
    fn test_marker_start_is_not_anchored() {
        assert!(is_pointer_touch_released("XPOINTER_TOUCH 0"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert_eq!(classify("touch_up"), EventKind::Other);
        assert_eq!(classify("pointer_touch 0"), EventKind::Other);
    }

    #[test]
    fn test_other_lines() {
        for line in ["", "POINTER_MOTION", "TOUCH_DOWN", "TOUCH_MOTION", "KEYBOARD_KEY"] {
            assert_eq!(classify(line), EventKind::Other, "строка {:?}", line);
        }
    }
}
