// Bracket balance check for (), [] and {}
// Any other character is ignored

fn closing_for(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

fn is_closing(c: char) -> bool {
    matches!(c, ')' | ']' | '}')
}

pub fn are_brackets_balanced(text: &str) -> bool {
    let mut expected: Vec<char> = Vec::new();

    for c in text.chars() {
        if let Some(close) = closing_for(c) {
            expected.push(close);
        } else if is_closing(c) && expected.pop() != Some(c) {
            return false;
        }
    }

    expected.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced() {
        assert!(are_brackets_balanced("([{}])"));
        assert!(are_brackets_balanced("fn main() { let v = [1, 2]; }"));
        assert!(are_brackets_balanced(""));
    }

    #[test]
    fn test_unbalanced() {
        assert!(!are_brackets_balanced("({[})"), "mismatched");
        assert!(!are_brackets_balanced("({["), "unclosed");
        assert!(!are_brackets_balanced("})"), "closing without opening");
    }
}
