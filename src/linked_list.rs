// 🔗 Linked List - singly linked sequence with threshold removal
// Plus the editor state behind the "add / remove greater than" controls

use tracing::debug;

struct Node<T> {
    value: T,
    next: Option<Box<Node<T>>>,
}

/// LinkedList - Singly linked, boxed nodes, tail append in O(n)
pub struct LinkedList<T> {
    head: Option<Box<Node<T>>>,
    size: usize,
}

impl<T> LinkedList<T> {
    pub fn new() -> Self {
        LinkedList { head: None, size: 0 }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Insert at the tail
    pub fn append(&mut self, value: T) {
        let mut cursor = &mut self.head;
        while let Some(node) = cursor {
            cursor = &mut node.next;
        }
        *cursor = Some(Box::new(Node { value, next: None }));
        self.size += 1;
    }

    /// Drop every node whose value exceeds `threshold`, head included.
    /// Surviving nodes keep their relative order.
    pub fn remove_greater_than(&mut self, threshold: &T)
    where
        T: PartialOrd,
    {
        let mut remaining = self.head.take();
        let mut tail = &mut self.head;

        while let Some(mut node) = remaining {
            remaining = node.next.take();
            if node.value > *threshold {
                self.size -= 1;
            } else {
                tail = &mut tail.insert(node).next;
            }
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Contents from head to tail
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for LinkedList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = LinkedList::new();
        let mut tail = &mut list.head;
        for value in iter {
            tail = &mut tail.insert(Box::new(Node { value, next: None })).next;
            list.size += 1;
        }
        list
    }
}

// Unlink iteratively so long lists don't recurse on drop
impl<T> Drop for LinkedList<T> {
    fn drop(&mut self) {
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }
}

pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.value
        })
    }
}

// ============================================================================
// EDITOR STATE
// ============================================================================

/// Parse the leading integer of `input`.
///
/// Leading whitespace and one sign are accepted and anything after the digits
/// is ignored, so `"12abc"` is 12. Returns None when there are no digits or
/// the value does not fit in an i64.
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());

    if digits_end == 0 {
        return None;
    }

    let digits = &rest[..digits_end];
    if negative {
        format!("-{digits}").parse().ok()
    } else {
        digits.parse().ok()
    }
}

/// Which editor input has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    Add,
    Threshold,
}

impl ListField {
    pub fn toggle(&self) -> Self {
        match self {
            ListField::Add => ListField::Threshold,
            ListField::Threshold => ListField::Add,
        }
    }
}

/// ListEditor - The list plus its two text inputs
///
/// Inputs that don't parse as an integer are ignored: the list stays as it
/// was and the text stays in the box.
#[derive(Debug, Clone, Default)]
pub struct ListEditor {
    pub list: LinkedList<i64>,
    pub add_input: String,
    pub threshold_input: String,
}

impl ListEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_mut(&mut self, field: ListField) -> &mut String {
        match field {
            ListField::Add => &mut self.add_input,
            ListField::Threshold => &mut self.threshold_input,
        }
    }

    /// Append the parsed add input; true if the list changed
    pub fn submit_add(&mut self) -> bool {
        match parse_leading_int(&self.add_input) {
            Some(value) => {
                self.list.append(value);
                self.add_input.clear();
                debug!(value, len = self.list.len(), "node appended");
                true
            }
            None => false,
        }
    }

    /// Remove everything above the parsed threshold; true if the input parsed
    pub fn submit_threshold(&mut self) -> bool {
        match parse_leading_int(&self.threshold_input) {
            Some(threshold) => {
                let before = self.list.len();
                self.list.remove_greater_than(&threshold);
                self.threshold_input.clear();
                debug!(threshold, removed = before - self.list.len(), "nodes removed");
                true
            }
            None => false,
        }
    }

    pub fn submit(&mut self, field: ListField) -> bool {
        match field {
            ListField::Add => self.submit_add(),
            ListField::Threshold => self.submit_threshold(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut list = LinkedList::new();
        for value in [3, 1, 4, 1, 5] {
            list.append(value);
        }

        assert_eq!(list.to_vec(), vec![3, 1, 4, 1, 5]);
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn test_remove_greater_than() {
        let mut list: LinkedList<i64> = [5, 1, 9, 3].into_iter().collect();
        list.remove_greater_than(&4);

        assert_eq!(list.to_vec(), vec![1, 3]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove_greater_than_keeps_equal_values() {
        let mut list: LinkedList<i64> = [4, 4, 5].into_iter().collect();
        list.remove_greater_than(&4);
        assert_eq!(list.to_vec(), vec![4, 4]);
    }

    #[test]
    fn test_remove_everything_then_append() {
        let mut list: LinkedList<i64> = [7, 8, 9].into_iter().collect();
        list.remove_greater_than(&0);

        assert!(list.is_empty());
        assert_eq!(list.len(), 0);

        list.append(2);
        assert_eq!(list.to_vec(), vec![2]);
    }

    #[test]
    fn test_clone_is_independent() {
        let original: LinkedList<i64> = [1, 2, 3].into_iter().collect();
        let mut copy = original.clone();
        copy.remove_greater_than(&1);

        assert_eq!(original.to_vec(), vec![1, 2, 3]);
        assert_eq!(copy.to_vec(), vec![1]);
        assert_eq!(format!("{:?}", original), "[1, 2, 3]");
    }

    #[test]
    fn test_long_list_drops_without_overflow() {
        let list: LinkedList<u32> = (0..200_000).collect();
        assert_eq!(list.len(), 200_000);
        drop(list);
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("  -7"), Some(-7));
        assert_eq!(parse_leading_int("+3"), Some(3));
        assert_eq!(parse_leading_int("12abc"), Some(12));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("99999999999999999999"), None);
    }

    #[test]
    fn test_editor_ignores_invalid_input() {
        let mut editor = ListEditor::new();
        editor.add_input = "nope".to_string();

        assert!(!editor.submit_add());
        assert!(editor.list.is_empty());
        assert_eq!(editor.add_input, "nope");
    }

    #[test]
    fn test_editor_add_and_remove() {
        let mut editor = ListEditor::new();
        for value in ["5", "1", "9", "3"] {
            editor.input_mut(ListField::Add).push_str(value);
            assert!(editor.submit(ListField::Add));
            assert!(editor.add_input.is_empty());
        }

        editor.threshold_input = "4".to_string();
        assert!(editor.submit(ListField::Threshold));
        assert_eq!(editor.list.to_vec(), vec![1, 3]);
        assert!(editor.threshold_input.is_empty());

        editor.threshold_input = "x".to_string();
        assert!(!editor.submit_threshold());
        assert_eq!(editor.list.to_vec(), vec![1, 3]);
    }
}
