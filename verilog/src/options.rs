/// Formatting choices for the generated module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub module_name: String,
    /// Comment placed at the top of the file; `None` omits it.
    pub header: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options { module_name: "mymodule".to_owned(), header: Some("// Autogenerated datapath module".to_owned()) }
    }
}

impl Options {
    pub fn with_module_name(self, module_name: impl Into<String>) -> Self {
        Self { module_name: module_name.into(), ..self }
    }

    pub fn with_header(self, header: impl Into<String>) -> Self {
        Self { header: Some(header.into()), ..self }
    }

    pub fn without_header(self) -> Self {
        Self { header: None, ..self }
    }
}
