/// Per-field metadata threaded through the replacer chain.
///
/// Built fresh by the schema walker for every field and read-only once handed
/// to a replacer. Options are attached fluently:
///
/// ```
/// use mimicry_synth::GenerationState;
///
/// let state = GenerationState::new()
///     .with_name("user")
///     .with_name("email")
///     .with_read_only();
/// assert_eq!(state.dotted_path(), "user.email");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationState {
    /// Field names from the document root to the current field.
    pub name_path: Vec<String>,
    /// Position inside the enclosing array, when there is one.
    pub element_index: Option<usize>,
    pub is_header: bool,
    pub is_path: bool,
    /// Leading lookup segment used in place of the walker-provided root.
    pub name_override: Option<String>,
    /// The field is being generated for response (read) content.
    pub is_content_read_only: bool,
    /// The field is being generated for request (write) content.
    pub is_content_write_only: bool,
    pub content_type: Option<String>,
}

impl GenerationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name_path.push(name.into());
        self
    }

    pub fn with_name_path<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.name_path.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_element_index(mut self, index: usize) -> Self {
        self.element_index = Some(index);
        self
    }

    pub fn with_header(mut self) -> Self {
        self.is_header = true;
        self
    }

    pub fn with_path(mut self) -> Self {
        self.is_path = true;
        self
    }

    pub fn with_name_override(mut self, name: impl Into<String>) -> Self {
        self.name_override = Some(name.into());
        self
    }

    pub fn with_read_only(mut self) -> Self {
        self.is_content_read_only = true;
        self
    }

    pub fn with_write_only(mut self) -> Self {
        self.is_content_write_only = true;
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Child state for a nested field, keeping area and direction flags.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut child = self.clone();
        child.element_index = None;
        child.name_path.push(name.into());
        child
    }

    /// The field's own name, which is the last path segment.
    pub fn field_name(&self) -> Option<&str> {
        self.name_path.last().map(String::as_str)
    }

    /// First path segment; area-scoped lookups key on it.
    pub fn root_name(&self) -> Option<&str> {
        self.name_path.first().map(String::as_str)
    }

    /// Segments used for context lookup: the override (if any) followed by the
    /// name path.
    pub fn lookup_path(&self) -> Vec<&str> {
        self.name_override
            .iter()
            .map(String::as_str)
            .chain(self.name_path.iter().map(String::as_str))
            .collect()
    }

    pub fn dotted_path(&self) -> String {
        self.name_path.join(".")
    }
}
