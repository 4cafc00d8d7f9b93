//! Example assertions

use super::matchers::Matcher;
use super::model::DescriptionArg;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Why an assertion did not hold
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssertionError {
    /// The target was queried and the expectation is false
    #[error("{message}")]
    Failed { message: String },

    /// The target could not be queried
    #[error("{message}")]
    Errored { message: String },
}

/// What an example asserts against: the group's subject and property focus
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a> {
    target: Option<&'a DescriptionArg>,
    property_path: &'a [String],
}

impl<'a> Subject<'a> {
    pub fn new(target: Option<&'a DescriptionArg>, property_path: &'a [String]) -> Self {
        Self {
            target,
            property_path,
        }
    }

    pub fn target(&self) -> Option<&'a DescriptionArg> {
        self.target
    }

    pub fn property_path(&self) -> &'a [String] {
        self.property_path
    }

    /// Query a property below the current focus
    ///
    /// Nested focuses are joined with `.`, so a group focused on `config`
    /// asking for `port` queries `config.port`.
    pub fn value(&self, property: Option<&str>) -> Result<Value, AssertionError> {
        let mut path: Vec<&str> = self.property_path.iter().map(String::as_str).collect();
        if let Some(property) = property.filter(|p| !p.is_empty()) {
            path.push(property);
        }

        if path.is_empty() {
            return Err(AssertionError::Errored {
                message: "no property selected".to_string(),
            });
        }

        match self.target {
            Some(DescriptionArg::Resource(resource)) => resource
                .property(&path.join("."))
                .map_err(|e| AssertionError::Errored {
                    message: e.to_string(),
                }),
            Some(DescriptionArg::Label(label)) => Err(AssertionError::Errored {
                message: format!("'{}' is not a resource", label),
            }),
            None => Err(AssertionError::Errored {
                message: "example has no subject".to_string(),
            }),
        }
    }
}

/// Declarative `property should <matcher>` assertion
#[derive(Debug, Clone)]
pub struct Expectation {
    pub property: Option<String>,
    pub matcher: Matcher,
}

impl Expectation {
    pub fn new(property: Option<impl Into<String>>, matcher: Matcher) -> Self {
        Self {
            property: property.map(Into::into),
            matcher,
        }
    }

    /// Expectation on the subject itself (or the current focus)
    pub fn on_subject(matcher: Matcher) -> Self {
        Self {
            property: None,
            matcher,
        }
    }

    pub fn evaluate(&self, subject: &Subject<'_>) -> Result<(), AssertionError> {
        let property = match (&self.matcher, self.property.as_deref()) {
            (Matcher::Exist, None) if subject.property_path().is_empty() => Some("exists"),
            (_, property) => property,
        };

        let actual = subject.value(property)?;
        self.matcher
            .evaluate(&actual)
            .map_err(|message| AssertionError::Failed { message })
    }

    pub fn describe(&self) -> String {
        match &self.property {
            Some(property) => format!("{} should {}", property, self.matcher),
            None => format!("should {}", self.matcher),
        }
    }
}

/// Closure assertion; the error string is the failure message
pub type CustomCheck = Arc<dyn Fn(&Subject<'_>) -> Result<(), String> + Send + Sync>;

/// Body of one example
#[derive(Clone)]
pub enum Assertion {
    Expect(Expectation),
    Custom { description: String, check: CustomCheck },
}

impl Assertion {
    pub fn expect(property: &str, matcher: Matcher) -> Self {
        Assertion::Expect(Expectation::new(Some(property), matcher))
    }

    pub fn custom<F>(description: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Subject<'_>) -> Result<(), String> + Send + Sync + 'static,
    {
        Assertion::Custom {
            description: description.into(),
            check: Arc::new(check),
        }
    }

    pub fn evaluate(&self, subject: &Subject<'_>) -> Result<(), AssertionError> {
        match self {
            Assertion::Expect(expectation) => expectation.evaluate(subject),
            Assertion::Custom { check, .. } => {
                check(subject).map_err(|message| AssertionError::Failed { message })
            }
        }
    }

    /// Generated description for examples declared without one
    pub fn describe(&self) -> String {
        match self {
            Assertion::Expect(expectation) => expectation.describe(),
            Assertion::Custom { description, .. } => description.clone(),
        }
    }
}

impl fmt::Debug for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assertion::Expect(expectation) => f.debug_tuple("Expect").field(expectation).finish(),
            Assertion::Custom { description, .. } => f
                .debug_struct("Custom")
                .field("description", description)
                .finish_non_exhaustive(),
        }
    }
}
