/// One auto-filter rule: apply the named operation at the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Path expression addressing the node to filter.
    pub path: String,
    /// Operation name, resolved against the filter catalog at construction.
    pub operation: String,
}

/// An ordered set of auto-filter rules.
///
/// Rules apply exactly once, in declaration order, when a
/// [`Cage`](crate::Cage) is constructed with them. Operation names are
/// validated against the filter catalog up front; paths that do not resolve
/// are skipped silently.
///
/// # Examples
///
/// ```
/// use input_cage::RuleSet;
///
/// let rules = RuleSet::parse_ini("
///     ; filter incoming form fields
///     userid   = getInt
///     username = getAlpha
/// ");
/// assert_eq!(rules.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule, keeping declaration order.
    pub fn push(&mut self, path: impl Into<String>, operation: impl Into<String>) {
        self.rules.push(Rule {
            path: path.into(),
            operation: operation.into(),
        });
    }

    /// Builds a rule set from `(path, operation)` pairs.
    pub fn from_pairs<P, O>(pairs: impl IntoIterator<Item = (P, O)>) -> Self
    where
        P: Into<String>,
        O: Into<String>,
    {
        let mut set = Self::new();
        for (path, operation) in pairs {
            set.push(path, operation);
        }
        set
    }

    /// Parses the conventional `key = filterName` textual format.
    ///
    /// Blank lines, `;`/`#` comments, and `[section]` headers are ignored.
    /// Parsing itself never fails; an operation name the catalog does not
    /// recognize fails later, at cage construction.
    pub fn parse_ini(text: &str) -> Self {
        let mut set = Self::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty()
                || line.starts_with(';')
                || line.starts_with('#')
                || line.starts_with('[')
            {
                continue;
            }
            if let Some((key, op)) = line.split_once('=') {
                let key = key.trim();
                let op = op.trim().trim_matches('"');
                if !key.is_empty() && !op.is_empty() {
                    set.push(key, op);
                }
            }
        }
        set
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }
}
