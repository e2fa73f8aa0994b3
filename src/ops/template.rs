use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::model::config::TemplateConfig;
use crate::model::region::Region;

/// `{identifier}` with no inner whitespace. `{ Subject }` in an import line
/// does not match and is left alone.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern compiles")
});

/// The fixed wrapper every output file gets.
///
/// ```text
/// <import>
///
/// /**
///  * <header lines>
///  * Lines <start>-<end> from original document
///  */
///
/// export const <export>[: <type>] = <content>
/// ```
///
/// followed by a single newline after the content.
#[derive(Debug, Clone)]
pub struct Template {
    import: String,
    type_annotation: Option<String>,
    header: Vec<String>,
    source_label: String,
}

impl Template {
    /// `source_label` fills the `{source}` placeholder, usually the source
    /// file name.
    pub fn new(config: &TemplateConfig, source_label: &str) -> Self {
        Template {
            import: config.import.clone(),
            type_annotation: config
                .type_annotation
                .as_ref()
                .filter(|t| !t.trim().is_empty())
                .cloned(),
            header: config.header.clone(),
            source_label: source_label.to_string(),
        }
    }

    /// Render `content` (the raw slice) for `region`.
    pub fn render(&self, region: &Region, content: &str) -> String {
        let mut out = self.prefix(region);
        out.push_str(content);
        out.push('\n');
        out
    }

    /// Recover the raw slice from text produced by [`Template::render`].
    /// Returns `None` if `text` does not start with this region's prefix.
    pub fn unwrap_body<'a>(&self, region: &Region, text: &'a str) -> Option<&'a str> {
        text.strip_prefix(self.prefix(region).as_str())?
            .strip_suffix('\n')
    }

    /// What the validator expects to find for the import line.
    pub fn import_marker(&self, region: &Region) -> String {
        self.substitute(&self.import, region)
    }

    /// What the validator expects to find for the export binding.
    pub fn export_marker(&self, region: &Region) -> String {
        format!("export const {}", region.export_name())
    }

    fn prefix(&self, region: &Region) -> String {
        let mut out = String::new();
        out.push_str(&self.import_marker(region));
        out.push_str("\n\n/**\n");
        for line in &self.header {
            let line = self.substitute(line, region);
            if line.is_empty() {
                out.push_str(" *\n");
            } else {
                out.push_str(" * ");
                out.push_str(&line);
                out.push('\n');
            }
        }
        out.push_str(&format!(
            " * Lines {}-{} from original document\n */\n\n",
            region.start, region.end
        ));
        out.push_str(&self.export_marker(region));
        if let Some(ty) = &self.type_annotation {
            out.push_str(": ");
            out.push_str(ty);
        }
        out.push_str(" = ");
        out
    }

    /// Fill `{placeholder}`s from the region. Unknown names stay verbatim.
    fn substitute(&self, text: &str, region: &Region) -> String {
        PLACEHOLDER
            .replace_all(text, |caps: &Captures| {
                let key = &caps[1];
                match key {
                    "name" => region.name.clone(),
                    "key" => region.key.clone(),
                    "export" => region.export_name(),
                    "start" => region.start.to_string(),
                    "end" => region.end.to_string(),
                    "source" => self.source_label.clone(),
                    _ => region
                        .meta
                        .get(key)
                        .cloned()
                        .unwrap_or_else(|| caps[0].to_string()),
                }
            })
            .into_owned()
    }
}
