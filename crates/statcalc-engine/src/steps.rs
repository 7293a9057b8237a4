use serde::Serialize;

/// Ordered derivation trail attached to every calculation result.
///
/// Lines are appended while a calculator assembles its result and are
/// read-only afterwards. Each line is formatted from values that were already
/// computed, so the trail always agrees with the numeric fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Steps(Vec<String>);

impl Steps {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, line: impl Into<String>) {
        self.0.push(line.into());
    }

    pub(crate) fn extend<I>(&mut self, lines: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.0.extend(lines.into_iter().map(Into::into));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S> FromIterator<S> for Steps
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S, const N: usize> From<[S; N]> for Steps
where
    S: Into<String>,
{
    fn from(lines: [S; N]) -> Self {
        lines.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Steps {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Formats a slice of numbers the way the derivation steps print lists.
pub(crate) fn format_list(values: &[f64]) -> String {
    let items = values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{items}]")
}

/// Formats a confidence level (0.95) as a percentage (95).
pub(crate) fn percent(level: f64) -> f64 {
    level * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_keep_insertion_order() {
        let mut steps = Steps::new();
        steps.push("given");
        steps.extend(["intermediate", "final"]);
        assert_eq!(steps.iter().collect::<Vec<_>>(), ["given", "intermediate", "final"]);
        assert_eq!(steps.len(), 3);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let steps = ["a", "b"].into_iter().collect::<Steps>();
        assert_eq!(serde_json::to_string(&steps).unwrap(), r#"["a","b"]"#);
    }

    #[test]
    fn test_format_list() {
        assert_eq!(format_list(&[1.0, 2.5, -3.0]), "[1, 2.5, -3]");
        assert_eq!(format_list(&[]), "[]");
    }
}
