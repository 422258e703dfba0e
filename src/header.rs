//! HTTP header fields
use std::{fmt::Display, io::Write};

/// Multimap of HTTP header fields.
///
/// Names are case-sensitive and kept as given. Each name maps to an ordered
/// sequence of values. Names are iterated in the order they were first
/// inserted.
///
/// No validation is performed on whether the names or values are valid HTTP
/// values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: Vec<(String, Vec<String>)>,
}

impl Headers {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Returns the number of distinct names.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.fields.clear()
    }

    /// Appends a value to the values of the given name.
    pub fn add<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        let name = name.into();
        let value = value.into();

        match self.position(&name) {
            Some(index) => self.fields[index].1.push(value),
            None => self.fields.push((name, vec![value])),
        }
    }

    /// Replaces all values of the given name with a single value.
    pub fn set<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        let name = name.into();
        let value = value.into();

        match self.position(&name) {
            Some(index) => self.fields[index].1 = vec![value],
            None => self.fields.push((name, vec![value])),
        }
    }

    /// Returns the first value, or an empty string if there is none.
    ///
    /// A missing name and an empty value are indistinguishable here; use
    /// [`Self::get_all()`] when that matters.
    pub fn get(&self, name: &str) -> &str {
        self.get_all(name)
            .and_then(|values| values.first())
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Returns all values of a name in insertion order.
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        self.position(name)
            .map(|index| self.fields[index].1.as_slice())
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.position(name)
            .map(|index| self.fields.remove(index).1)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns the distinct names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _values)| name.as_str())
    }

    /// Returns a name-value pair for every value.
    pub fn iter(&self) -> HeadersIter<'_> {
        HeadersIter {
            fields: self.fields.iter(),
            current: None,
        }
    }

    /// Writes a `Name: Value\n` line for every value.
    ///
    /// No terminating empty line is written.
    pub fn serialize<W: Write>(&self, mut buf: W) -> std::io::Result<()> {
        for (name, value) in self {
            buf.write_all(name.as_bytes())?;
            buf.write_all(b": ")?;
            buf.write_all(value.as_bytes())?;
            buf.write_all(b"\n")?;
        }

        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _v)| n == name)
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a str, &'a str);
    type IntoIter = HeadersIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<N: Into<String>, V: Into<String>> Extend<(N, V)> for Headers {
    fn extend<T: IntoIterator<Item = (N, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.add(name, value);
        }
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut headers = Self::new();
        headers.extend(iter);
        headers
    }
}

impl Display for Headers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (name, value) in self {
            writeln!(f, "{}: {}", name, value)?;
        }

        Ok(())
    }
}

pub struct HeadersIter<'a> {
    fields: std::slice::Iter<'a, (String, Vec<String>)>,
    current: Option<(&'a str, std::slice::Iter<'a, String>)>,
}

impl<'a> Iterator for HeadersIter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((name, values)) = &mut self.current {
                if let Some(value) = values.next() {
                    return Some((*name, value.as_str()));
                }
            }

            let (name, values) = self.fields.next()?;
            self.current = Some((name.as_str(), values.iter()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_add_get_all() {
        let mut h = Headers::new();

        h.add("Multiple", "first");
        h.add("Multiple", "second");
        h.add("Multiple", "third");

        assert_eq!(h.len(), 1);
        assert_eq!(h.get("Multiple"), "first");
        assert_eq!(
            h.get_all("Multiple").unwrap(),
            ["first", "second", "third"]
        );
    }

    #[test]
    fn test_headers_set_overwrites() {
        let mut h = Headers::new();

        h.add("n1", "v1-0");
        h.add("n1", "v1-1");
        h.set("n1", "v1-2");
        h.set("n2", "v2-0");

        assert_eq!(h.get_all("n1").unwrap(), ["v1-2"]);
        assert_eq!(h.get_all("n2").unwrap(), ["v2-0"]);
    }

    #[test]
    fn test_headers_absent() {
        let mut h = Headers::new();

        assert_eq!(h.get("missing"), "");
        assert_eq!(h.get("missing"), "");
        assert_eq!(h.get_all("missing"), None);
        assert!(!h.contains_name("missing"));

        h.add("empty", "");
        assert_eq!(h.get("empty"), "");
        assert_eq!(h.get_all("empty").unwrap(), [""]);
    }

    #[test]
    fn test_headers_case_sensitive() {
        let h = Headers::from_iter([("Host", "a"), ("host", "b")]);

        assert_eq!(h.len(), 2);
        assert_eq!(h.get("Host"), "a");
        assert_eq!(h.get("host"), "b");
        assert_eq!(h.get("HOST"), "");
    }

    #[test]
    fn test_headers_remove() {
        let mut h = Headers::from_iter([("n1", "v1"), ("n2", "v2-0"), ("n2", "v2-1")]);

        assert_eq!(h.remove("n2"), Some(vec!["v2-0".to_string(), "v2-1".to_string()]));
        assert_eq!(h.remove("n2"), None);
        assert_eq!(h.names().collect::<Vec<_>>(), vec!["n1"]);

        h.clear();
        assert!(h.is_empty());
    }

    #[test]
    fn test_headers_iterator() {
        let h = Headers::from_iter([("n1", "v1"), ("n2", "v2-0"), ("n3", "v3"), ("n2", "v2-1")]);

        assert_eq!(
            h.iter().collect::<Vec<_>>(),
            vec![("n1", "v1"), ("n2", "v2-0"), ("n2", "v2-1"), ("n3", "v3")]
        );
    }

    #[test]
    fn test_headers_serialize() {
        let h = Headers::from_iter([("A", "1"), ("B", "2"), ("A", "3")]);

        let mut buf = Vec::new();
        h.serialize(&mut buf).unwrap();

        assert_eq!(buf, b"A: 1\nA: 3\nB: 2\n");
        assert_eq!(h.to_string(), "A: 1\nA: 3\nB: 2\n");
    }
}
