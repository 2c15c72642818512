use regex::Regex;

/// Visual role of one rendered line of the script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Text,
    /// `①…` lines
    Numbered,
    /// `【…】` headings
    Bracket,
    /// `＜…＞` call-outs
    Emphasis,
    /// `◆…` subheadings
    Diamond,
    /// `●…` subheadings
    Dot,
}

impl BlockKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "h1" => Some(BlockKind::Numbered),
            "h2" => Some(BlockKind::Bracket),
            "em" => Some(BlockKind::Emphasis),
            "h3" => Some(BlockKind::Diamond),
            "h4" => Some(BlockKind::Dot),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    /// Inside a `<mark>` phrase
    pub marked: bool,
}

/// One line of the script as the view draws it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub fragments: Vec<Fragment>,
}

impl Block {
    fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            fragments: Vec::new(),
        }
    }

    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    pub fn is_blank(&self) -> bool {
        self.fragments.iter().all(|f| f.text.is_empty())
    }
}

/// Splits formatter markup into lines.
///
/// Block tags always start and end their own line. A block opened inside
/// another block keeps the outer kind, so `<em><em>x</em></em>` is one line.
/// `<br>` inside a block is ignored.
#[derive(Debug, Clone)]
pub struct MarkupParser {
    tag: Regex,
}

impl MarkupParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            tag: Regex::new(r"<(/?)(h1|h2|h3|h4|em|mark|br)>")?,
        })
    }

    pub fn parse(&self, markup: &str) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut current = Block::new(BlockKind::Text);
        let mut depth = 0usize;
        let mut marked = false;
        let mut last = 0;

        for caps in self.tag.captures_iter(markup) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            push_text(&mut current, &markup[last..whole.start()], marked);
            last = whole.end();

            let closing = !caps[1].is_empty();
            let name = &caps[2];

            match (name, closing) {
                ("br", _) => {
                    if depth == 0 {
                        blocks.push(std::mem::replace(&mut current, Block::new(BlockKind::Text)));
                    }
                }
                ("mark", closing) => marked = !closing,
                (tag, false) => {
                    if depth == 0 {
                        if !current.fragments.is_empty() {
                            blocks.push(std::mem::replace(
                                &mut current,
                                Block::new(BlockKind::Text),
                            ));
                        }
                        current.kind = BlockKind::from_tag(tag).unwrap_or(BlockKind::Text);
                    }
                    depth += 1;
                }
                (_, true) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        blocks.push(std::mem::replace(&mut current, Block::new(BlockKind::Text)));
                    }
                }
            }
        }

        push_text(&mut current, &markup[last..], marked);
        if !current.fragments.is_empty() {
            blocks.push(current);
        }
        blocks
    }
}

fn push_text(block: &mut Block, text: &str, marked: bool) {
    if !text.is_empty() {
        block.fragments.push(Fragment {
            text: text.to_string(),
            marked,
        });
    }
}
