use chrono::{DateTime, Datelike, Local, Timelike};
use regex::{NoExpand, Regex};

/// Placeholder in script bodies replaced by the lesson's date and time
pub const DATETIME_TOKEN: &str = "__DATETIME__";

/// `4月2日9時5分`: month, day, hour and minute without padding
pub fn datetime_label(t: &DateTime<Local>) -> String {
    format!("{}月{}日{}時{}分", t.month(), t.day(), t.hour(), t.minute())
}

#[derive(Debug, Clone)]
enum Replacement {
    /// Regex replacement template (`$1` style)
    Template(&'static str),
    /// The render-time date label
    DateTime,
}

#[derive(Debug, Clone)]
struct Rule {
    name: &'static str,
    pattern: Regex,
    replacement: Replacement,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, template: &'static str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
            replacement: Replacement::Template(template),
        })
    }
}

/// Turns a plain-text script body into block markup.
///
/// Rules run in a fixed order over the whole text; later rules see the
/// output of earlier ones. Output tags: `h1` circled-number headings, `h2`
/// bracket headings, `em` angle-bracket emphasis, `h3` diamond and `h4` dot
/// subheadings, `mark` inline phrases and `br` line breaks. See
/// [`super::markup`] for the parser.
#[derive(Debug, Clone)]
pub struct Formatter {
    rules: Vec<Rule>,
}

impl Formatter {
    /// `emphasis` lists phrases highlighted wherever they appear.
    pub fn new(emphasis: &[String]) -> Result<Self, regex::Error> {
        let mut rules = vec![
            Rule {
                name: "datetime",
                pattern: Regex::new(&regex::escape(DATETIME_TOKEN))?,
                replacement: Replacement::DateTime,
            },
            Rule::new("numbered", r"(?m)^[①-⑳](.+)$", "<h1>$0</h1>")?,
            Rule::new(
                "bracket-with-emphasis",
                r"(?m)^【([^】]+)】\n＜([^＞]+)＞",
                "<h2>【$1】</h2><em>＜$2＞</em>",
            )?,
            Rule::new("bracket", r"(?m)^【([^】]+)】", "<h2>【$1】</h2>")?,
            Rule::new("angle", r"＜([^＞]+)＞", "<em>＜$1＞</em>")?,
            Rule::new("diamond", r"◆([^\n]+)", "<h3>◆$1</h3>")?,
            Rule::new("dot", r"●([^\n]+)", "<h4>●$1</h4>")?,
        ];

        let phrases: Vec<String> = emphasis
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| regex::escape(p))
            .collect();
        if !phrases.is_empty() {
            rules.push(Rule {
                name: "phrases",
                pattern: Regex::new(&format!("({})", phrases.join("|")))?,
                replacement: Replacement::Template("<mark>$1</mark>"),
            });
        }

        rules.push(Rule::new("newline", r"\n", "<br>")?);
        rules.push(Rule::new(
            "tight-blocks",
            r"(</(?:h1|h2|h3|h4|em)>)<br>",
            "$1",
        )?);

        Ok(Self { rules })
    }

    pub fn render(&self, text: &str, now: &DateTime<Local>) -> String {
        let date = datetime_label(now);
        let mut out = text.to_string();

        for rule in &self.rules {
            out = match &rule.replacement {
                Replacement::Template(t) => rule.pattern.replace_all(&out, *t).into_owned(),
                Replacement::DateTime => rule
                    .pattern
                    .replace_all(&out, NoExpand(date.as_str()))
                    .into_owned(),
            };
        }
        out
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }
}
