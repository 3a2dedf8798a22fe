use std::collections::HashMap;

use tracing::{debug, trace};

use crate::accessor::{self, Builtin};
use crate::purifier::DefaultPurifier;
use crate::{path, Error, Filter, Purifier, RuleSet, Validator, Value};

/// A caller-supplied implementation for a registered custom accessor.
///
/// The closure observes the node the path resolved to and either produces a
/// value or reports a validation-style failure with `None`.
pub type CustomAccessor = Box<dyn Fn(&Value) -> Option<Value>>;

/// The guarded façade around one snapshot of untrusted nested input.
///
/// A `Cage` owns its snapshot exclusively and never re-exposes a stored
/// value except through a named accessor: a filter (`get`-family, total
/// transform), a validator (`test`-family, test-and-return), the purifier,
/// or the single audited escape hatch [`raw`](Cage::raw). One cage per
/// logical request; the type is deliberately not `Sync` — it is a
/// request-scoped input guard, not shared state.
///
/// # Examples
///
/// ```
/// use input_cage::{Cage, Value};
/// use serde_json::json;
///
/// let cage = Cage::new(Value::from(json!({
///     "x": {"woot": {"booyah": "meet at the bar at 7:30 pm"}},
/// })));
///
/// assert_eq!(cage.get_alpha("x/woot/booyah").unwrap(), "meetatthebaratpm");
/// assert_eq!(cage.get_alnum("x/woot/booyah").unwrap(), "meetatthebarat730pm");
/// assert_eq!(cage.get_digits("x/woot/booyah").unwrap(), "730");
/// assert!(cage.raw("x/woot/nope").is_err());
/// ```
pub struct Cage {
    snapshot: Value,
    accessors: Vec<String>,
    custom: HashMap<String, CustomAccessor>,
    purifier: Option<Box<dyn Purifier>>,
}

impl Cage {
    /// Wraps raw input in a cage with no auto-filter pass.
    pub fn new(raw: impl Into<Value>) -> Self {
        Self {
            snapshot: raw.into(),
            accessors: Vec::new(),
            custom: HashMap::new(),
            purifier: None,
        }
    }

    /// Wraps raw input and runs the auto-filter pass before the cage
    /// becomes observable.
    ///
    /// Every operation name is resolved against the filter catalog first;
    /// an unrecognized name aborts construction with
    /// [`Error::UnknownOperation`] before any value is touched, so a
    /// partially filtered cage never exists. Rules whose path does not
    /// resolve are skipped silently — input shape is attacker-chosen and a
    /// missing field is an expected case, unlike a misspelled filter name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOperation`] for the first rule whose
    /// operation the catalog does not recognize.
    ///
    /// # Examples
    ///
    /// ```
    /// use input_cage::{Cage, RuleSet, Value};
    /// use serde_json::json;
    ///
    /// let rules = RuleSet::from_pairs([("userid", "getInt"), ("username", "getAlpha")]);
    /// let cage = Cage::with_rules(
    ///     Value::from(json!({
    ///         "userid": "--12<strong>34</strong>",
    ///         "username": "se777v77enty_<em>fiv</em>e!",
    ///     })),
    ///     &rules,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(cage.raw("userid").unwrap(), &Value::Int(1234));
    /// assert_eq!(cage.raw("username").unwrap(), "seventyfive");
    /// ```
    pub fn with_rules(raw: impl Into<Value>, rules: &RuleSet) -> Result<Self, Error> {
        let mut resolved = Vec::with_capacity(rules.len());
        for rule in rules.iter() {
            let filter = Filter::from_name(&rule.operation)
                .ok_or_else(|| Error::unknown_operation(&rule.operation))?;
            resolved.push((rule.path.as_str(), filter));
        }

        let mut cage = Self::new(raw);
        for (rule_path, filter) in resolved {
            match path::resolve(&cage.snapshot, rule_path) {
                Some(node) => {
                    let filtered = filter.apply(node);
                    debug!(path = rule_path, filter = filter.name(), "auto-filter applied");
                    path::assign(&mut cage.snapshot, rule_path, filtered);
                }
                None => {
                    debug!(path = rule_path, filter = filter.name(), "auto-filter path absent, skipped");
                }
            }
        }
        Ok(cage)
    }

    // --- container contract (top level only) ---

    /// Iterates top-level keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.snapshot.keys()
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    /// Returns `true` when the snapshot has no top-level keys.
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Top-level key existence. Shallow by design; nested presence is a
    /// [`raw`](Cage::raw) question.
    pub fn contains_key(&self, key: &str) -> bool {
        self.snapshot.get(key).is_some()
    }

    /// Sets a top-level key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.snapshot.insert(key, value);
    }

    /// Removes a top-level key, returning the removed value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.snapshot.remove(key)
    }

    // --- core accessors ---

    /// The audited escape hatch: the exact stored node, unfiltered.
    ///
    /// Named distinctly so every bypass of the filter catalog is greppable.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] when the path does not resolve.
    pub fn raw(&self, path: &str) -> Result<&Value, Error> {
        path::resolve(&self.snapshot, path).ok_or_else(|| Error::key_not_found(path))
    }

    /// Applies a catalog filter to the node at `path`.
    ///
    /// Filters recurse element-wise into containers, so a map resolves to a
    /// map of filtered values.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] when the path does not resolve — absence is a
    /// contract bug for `get`-family reads, distinct from an empty result.
    pub fn filtered(&self, filter: Filter, path: &str) -> Result<Value, Error> {
        self.raw(path).map(|node| filter.apply(node))
    }

    /// Tests the node at `path`, returning the normalized value on success.
    ///
    /// Absence is treated as "does not satisfy", never an error; so is a
    /// container node. Calling code branches on the `Option`, it does not
    /// catch anything.
    pub fn test(&self, validator: &Validator, path: &str) -> Option<Value> {
        validator.check(path::resolve(&self.snapshot, path)?)
    }

    /// Dynamic accessor dispatch.
    ///
    /// Resolution order: built-in `get<Filter>`/`test<Validator>` names
    /// (plus `getRaw` and `getPurifiedHTML`) first, then the registered
    /// custom-accessor list. `Ok(Some)` carries the produced value,
    /// `Ok(None)` is a `test`-family or custom validation failure.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownAccessor`] when nothing recognizes the name,
    /// [`Error::KeyNotFound`] for `get`-family reads of absent paths, and
    /// [`Error::InvalidArguments`] when a validator name matches but its
    /// arguments cannot be decoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use input_cage::{Cage, Value};
    /// use serde_json::json;
    ///
    /// let mut cage = Cage::new(Value::from(json!({"b": "0"})));
    ///
    /// let hit = cage.invoke("testLessThan", "b", &[Value::Int(25)]).unwrap();
    /// assert_eq!(hit, Some(Value::from("0")));
    ///
    /// assert!(cage.invoke("getBogus", "b", &[]).is_err());
    /// ```
    pub fn invoke(
        &mut self,
        accessor: &str,
        path: &str,
        args: &[Value],
    ) -> Result<Option<Value>, Error> {
        if let Some(builtin) = accessor::resolve_builtin(accessor, args)? {
            trace!(accessor, path, "dispatching built-in accessor");
            return match builtin {
                Builtin::Get(filter) => self.filtered(filter, path).map(Some),
                Builtin::Test(validator) => Ok(self.test(&validator, path)),
                Builtin::Raw => self.raw(path).cloned().map(Some),
                Builtin::PurifiedHtml => self.purified_html(path).map(|s| Some(Value::Str(s))),
            };
        }
        if self.accessors.iter().any(|name| name == accessor) {
            trace!(accessor, path, "dispatching registered accessor");
            let node = self.raw(path)?;
            return Ok(match self.custom.get(accessor) {
                Some(implementation) => implementation(node),
                // recognition only: behaves like the raw accessor until the
                // caller attaches behavior
                None => Some(node.clone()),
            });
        }
        Err(Error::unknown_accessor(accessor))
    }

    // --- accessor registration ---

    /// Registers a custom accessor name.
    ///
    /// The list is append-only and not deduplicated: a name added twice is
    /// listed twice and behaves identically. No shape validation is
    /// performed on the name.
    pub fn add_accessor(&mut self, name: impl Into<String>) {
        self.accessors.push(name.into());
    }

    /// Registers a custom accessor name together with its implementation.
    pub fn add_accessor_with(
        &mut self,
        name: impl Into<String>,
        implementation: impl Fn(&Value) -> Option<Value> + 'static,
    ) {
        let name = name.into();
        self.custom.insert(name.clone(), Box::new(implementation));
        self.accessors.push(name);
    }

    /// The registered custom accessor names, in call order.
    pub fn accessors(&self) -> &[String] {
        &self.accessors
    }

    // --- purification ---

    /// Passes the string at `path` through the purification engine.
    ///
    /// When no engine was injected, a [`DefaultPurifier`] is created on
    /// first use, scoped to this cage instance. Purification applies to
    /// string scalars; addressing a container is a caller error.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] when the path does not resolve;
    /// [`Error::InvalidArguments`] when it resolves to a container.
    pub fn purified_html(&mut self, path: &str) -> Result<String, Error> {
        let text = self
            .raw(path)?
            .scalar_text()
            .ok_or_else(|| Error::invalid_arguments("getPurifiedHTML"))?
            .into_owned();
        let engine = self
            .purifier
            .get_or_insert_with(|| Box::new(DefaultPurifier));
        Ok(engine.purify(&text))
    }

    /// Injects a purification engine, replacing any existing one.
    ///
    /// To take effect deterministically this must happen before the first
    /// implicit use by [`purified_html`](Cage::purified_html).
    pub fn set_purifier(&mut self, engine: Box<dyn Purifier>) {
        self.purifier = Some(engine);
    }

    /// The currently held purification engine, if one exists yet.
    pub fn purifier(&self) -> Option<&dyn Purifier> {
        self.purifier.as_deref()
    }

    // --- typed convenience surface ---

    /// `get`-family: ASCII letters only.
    pub fn get_alpha(&self, path: &str) -> Result<Value, Error> {
        self.filtered(Filter::Alpha, path)
    }

    /// `get`-family: ASCII letters and digits only.
    pub fn get_alnum(&self, path: &str) -> Result<Value, Error> {
        self.filtered(Filter::Alnum, path)
    }

    /// `get`-family: ASCII digits only.
    pub fn get_digits(&self, path: &str) -> Result<Value, Error> {
        self.filtered(Filter::Digits, path)
    }

    /// `get`-family: first integer extracted from the value.
    pub fn get_int(&self, path: &str) -> Result<Value, Error> {
        self.filtered(Filter::Int, path)
    }

    /// `get`-family: trailing path segment stripped.
    pub fn get_dir(&self, path: &str) -> Result<Value, Error> {
        self.filtered(Filter::Dir, path)
    }

    /// `get`-family: absolute, normalized filesystem path.
    pub fn get_path(&self, path: &str) -> Result<Value, Error> {
        self.filtered(Filter::Path, path)
    }

    /// `get`-family: ROT13 substitution.
    pub fn get_rot13(&self, path: &str) -> Result<Value, Error> {
        self.filtered(Filter::Rot13, path)
    }

    /// `get`-family: tag runs stripped.
    pub fn get_no_tags(&self, path: &str) -> Result<Value, Error> {
        self.filtered(Filter::NoTags, path)
    }

    /// `get`-family: only the final path segment kept.
    pub fn get_no_path(&self, path: &str) -> Result<Value, Error> {
        self.filtered(Filter::NoPath, path)
    }

    /// `get`-family: tags stripped and special characters entity-escaped.
    pub fn get_no_tags_or_special(&self, path: &str) -> Result<Value, Error> {
        self.filtered(Filter::NoTagsOrSpecial, path)
    }

    /// `test`-family: ASCII letters only.
    pub fn test_alpha(&self, path: &str) -> Option<Value> {
        self.test(&Validator::Alpha, path)
    }

    /// `test`-family: ASCII letters and digits only.
    pub fn test_alnum(&self, path: &str) -> Option<Value> {
        self.test(&Validator::Alnum, path)
    }

    /// `test`-family: ASCII digits only.
    pub fn test_digits(&self, path: &str) -> Option<Value> {
        self.test(&Validator::Digits, path)
    }

    /// `test`-family: ASCII hex digits only.
    pub fn test_hex(&self, path: &str) -> Option<Value> {
        self.test(&Validator::Hex, path)
    }

    /// `test`-family: parses fully as an integer.
    pub fn test_int(&self, path: &str) -> Option<Value> {
        self.test(&Validator::Int, path)
    }

    /// `test`-family: parses fully as a finite number.
    pub fn test_float(&self, path: &str) -> Option<Value> {
        self.test(&Validator::Float, path)
    }

    /// `test`-family: numeric and strictly greater than `bound`.
    pub fn test_greater_than(&self, path: &str, bound: f64) -> Option<Value> {
        self.test(&Validator::GreaterThan(bound), path)
    }

    /// `test`-family: numeric and strictly less than `bound`.
    pub fn test_less_than(&self, path: &str, bound: f64) -> Option<Value> {
        self.test(&Validator::LessThan(bound), path)
    }

    /// `test`-family: numeric and within the inclusive range.
    pub fn test_between(&self, path: &str, min: f64, max: f64) -> Option<Value> {
        self.test(&Validator::Between { min, max }, path)
    }

    /// `test`-family: well-formed email address.
    pub fn test_email(&self, path: &str) -> Option<Value> {
        self.test(&Validator::Email, path)
    }

    /// `test`-family: well-formed hostname.
    pub fn test_hostname(&self, path: &str) -> Option<Value> {
        self.test(&Validator::Hostname, path)
    }

    /// `test`-family: IPv4 or IPv6 address.
    pub fn test_ip(&self, path: &str) -> Option<Value> {
        self.test(&Validator::Ip, path)
    }

    /// `test`-family: `scheme://` URI shape.
    pub fn test_uri(&self, path: &str) -> Option<Value> {
        self.test(&Validator::Uri, path)
    }

    /// `test`-family: US ZIP code.
    pub fn test_zip(&self, path: &str) -> Option<Value> {
        self.test(&Validator::Zip, path)
    }

    /// `test`-family: NANP phone number, normalized to ten digits.
    pub fn test_phone(&self, path: &str) -> Option<Value> {
        self.test(&Validator::Phone, path)
    }

    /// `test`-family: Luhn-valid card number, normalized to bare digits.
    pub fn test_ccnum(&self, path: &str) -> Option<Value> {
        self.test(&Validator::Ccnum, path)
    }

    /// `test`-family: `YYYY-MM-DD` calendar date.
    pub fn test_date(&self, path: &str) -> Option<Value> {
        self.test(&Validator::Date, path)
    }

    /// `test`-family: membership in a fixed set.
    pub fn test_one_of(&self, path: &str, options: &[&str]) -> Option<Value> {
        let set = options.iter().map(|s| s.to_string()).collect();
        self.test(&Validator::OneOf(set), path)
    }

    /// `test`-family: full regular-expression match.
    pub fn test_regex(&self, path: &str, pattern: &str) -> Option<Value> {
        self.test(&Validator::Regex(pattern.to_string()), path)
    }
}

impl std::fmt::Debug for Cage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // the snapshot is deliberately not printed: cage contents are
        // unsanitized by definition and must not leak into logs
        f.debug_struct("Cage")
            .field("keys", &self.snapshot.keys().collect::<Vec<_>>())
            .field("accessors", &self.accessors)
            .field("purifier", &self.purifier.is_some())
            .finish()
    }
}
