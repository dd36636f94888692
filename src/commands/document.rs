//! Presentation documents and their Markdown rendering.
//!
//! A [`Document`] is the structured reply of a command: an author block, an
//! optional title and description, named fields and a footer. It knows nothing
//! about Matrix; [`Document::to_markdown`] is the only place turning it into
//! something a room can display.

/// Author block shown on top of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Display name
    pub name: String,
    /// Link attached to the name
    pub url: Option<String>,
}

/// A named block of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Value, one entry per line
    pub value: String,
}

/// Structured reply content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub author: Option<Author>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<Field>,
    /// Footer text. The latency wrapper overwrites it on success.
    pub footer: Option<String>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Document::default()
    }

    /// Creates an error document carrying `message`, titled `Error`.
    pub fn error(message: &str) -> Self {
        Document::new()
            .with_title("Error")
            .with_description(message)
    }

    pub fn with_author(mut self, name: &str, url: Option<String>) -> Self {
        self.author = Some(Author {
            name: name.to_owned(),
            url,
        });
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_owned());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Appends a field. Fields are rendered in insertion order.
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.push(Field {
            name: name.to_owned(),
            value: value.to_owned(),
        });
        self
    }

    /// Looks a field up by name.
    #[cfg(test)]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Renders the document as Markdown.
    ///
    /// Blocks are separated by a blank line; field values become bullet lists
    /// so each value line stays on its own line once rendered.
    pub fn to_markdown(&self) -> String {
        let mut blocks: Vec<String> = Vec::new();

        if let Some(author) = &self.author {
            blocks.push(match &author.url {
                Some(url) => format!("**[{}]({})**", author.name, url),
                None => format!("**{}**", author.name),
            });
        }

        if let Some(title) = &self.title {
            blocks.push(format!("### {}", title));
        }

        if let Some(description) = &self.description {
            blocks.push(description.clone());
        }

        for field in &self.fields {
            let lines = field
                .value
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| format!("- {}", line))
                .collect::<Vec<String>>()
                .join("\n");
            blocks.push(format!("**{}**\n{}", field.name, lines));
        }

        if let Some(footer) = &self.footer {
            blocks.push(format!("_{}_", footer));
        }

        blocks.join("\n\n")
    }
}
