use super::ids::ComponentId;
use super::uri::Uri;

/// A user-defined grouping of DNA components, e.g. every part used in a
/// project or a set of restriction-site features.
///
/// Components are shared: the same component may sit in several collections.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub uri: Option<Uri>,
    pub display_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub(crate) components: Vec<ComponentId>,
}

impl Collection {
    pub fn new(display_id: &str) -> Self {
        Self {
            display_id: Some(display_id.to_string()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    pub fn components(&self) -> &[ComponentId] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub(crate) fn label(&self) -> String {
        self.display_id
            .clone()
            .unwrap_or_else(|| String::from("<unnamed collection>"))
    }
}
