/// Strips angle brackets out of free-text input and trims whitespace.
///
/// Request DTOs implement this for every user-supplied string so persisted
/// text can be rendered without further escaping.
pub trait Sanitize {
    fn sanitize(&mut self);
}

impl Sanitize for String {
    fn sanitize(&mut self) {
        if self.contains(['<', '>']) {
            self.retain(|c| c != '<' && c != '>');
        }
        let trimmed = self.trim();
        if trimmed.len() != self.len() {
            *self = trimmed.to_string();
        }
    }
}

impl<T: Sanitize> Sanitize for Option<T> {
    fn sanitize(&mut self) {
        if let Some(value) = self {
            value.sanitize();
        }
    }
}

impl<T: Sanitize> Sanitize for Vec<T> {
    fn sanitize(&mut self) {
        for value in self {
            value.sanitize();
        }
    }
}
