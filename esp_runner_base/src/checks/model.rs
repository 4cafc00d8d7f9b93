//! Rules, checks and check bodies

use super::assertion::Assertion;
use crate::resources::Resource;
use std::fmt;
use std::sync::Arc;

/// One element of a check description
#[derive(Clone)]
pub enum DescriptionArg {
    Resource(Arc<dyn Resource>),
    Label(String),
}

impl DescriptionArg {
    pub fn label(text: impl Into<String>) -> Self {
        DescriptionArg::Label(text.into())
    }

    pub fn resource(&self) -> Option<&Arc<dyn Resource>> {
        match self {
            DescriptionArg::Resource(resource) => Some(resource),
            DescriptionArg::Label(_) => None,
        }
    }

    /// Skip reason declared by a resource; labels never skip
    pub fn skip_reason(&self) -> Option<String> {
        self.resource().and_then(|resource| resource.skip_reason())
    }
}

impl From<Arc<dyn Resource>> for DescriptionArg {
    fn from(resource: Arc<dyn Resource>) -> Self {
        DescriptionArg::Resource(resource)
    }
}

impl fmt::Display for DescriptionArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptionArg::Resource(resource) => write!(f, "{}", resource.describe()),
            DescriptionArg::Label(label) => write!(f, "{}", label),
        }
    }
}

impl fmt::Debug for DescriptionArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptionArg::Resource(resource) => f
                .debug_tuple("Resource")
                .field(&resource.resource_type())
                .field(&resource.describe())
                .finish(),
            DescriptionArg::Label(label) => f.debug_tuple("Label").field(label).finish(),
        }
    }
}

/// Ordered examples and nested groups of a check
#[derive(Debug, Clone, Default)]
pub struct CheckBody {
    pub items: Vec<BodyItem>,
}

#[derive(Debug, Clone)]
pub enum BodyItem {
    Example {
        description: Option<String>,
        assertion: Assertion,
    },
    /// Nested group, optionally focused on one property of the subject
    Group {
        description: String,
        property: Option<String>,
        body: CheckBody,
    },
}

impl CheckBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Example with a generated description
    pub fn it(mut self, assertion: Assertion) -> Self {
        self.items.push(BodyItem::Example {
            description: None,
            assertion,
        });
        self
    }

    pub fn example(mut self, description: impl Into<String>, assertion: Assertion) -> Self {
        self.items.push(BodyItem::Example {
            description: Some(description.into()),
            assertion,
        });
        self
    }

    pub fn describe(mut self, description: impl Into<String>, body: CheckBody) -> Self {
        self.items.push(BodyItem::Group {
            description: description.into(),
            property: None,
            body,
        });
        self
    }

    /// Group whose examples query below `property`
    pub fn its(mut self, property: impl Into<String>, body: CheckBody) -> Self {
        let property = property.into();
        self.items.push(BodyItem::Group {
            description: property.clone(),
            property: Some(property),
            body,
        });
        self
    }

    pub fn push(&mut self, item: BodyItem) {
        self.items.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Description plus body, as declared inside a rule
#[derive(Debug, Clone)]
pub struct Check {
    pub description: Vec<DescriptionArg>,
    pub body: CheckBody,
    /// Declaration line within the content unit
    pub line: Option<usize>,
}

impl Check {
    pub fn new(description: Vec<DescriptionArg>, body: CheckBody) -> Self {
        Self {
            description,
            body,
            line: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Description args joined by spaces
    pub fn describe(&self) -> String {
        self.description
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// First description arg, the thing examples assert against
    pub fn subject(&self) -> Option<&DescriptionArg> {
        self.description.first()
    }

    pub fn skip_reason(&self) -> Option<String> {
        self.subject().and_then(DescriptionArg::skip_reason)
    }
}

/// Named unit of checks, identified within its profile
#[derive(Debug, Clone, Default)]
pub struct Rule {
    pub id: String,
    pub title: Option<String>,
    pub impact: Option<f64>,
    pub checks: Vec<Check>,
}

impl Rule {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_impact(mut self, impact: f64) -> Self {
        self.impact = Some(impact);
        self
    }

    pub fn with_check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }
}
