use super::lesson::{Lesson, Section};

/// Cursor over the fixed, ordered sections of a lesson
#[derive(Debug, Clone)]
pub struct Navigator {
    sections: Vec<Section>,
    index: usize,
}

impl Navigator {
    pub fn new(lesson: &Lesson) -> Self {
        Self {
            sections: lesson.sections.clone(),
            index: 0,
        }
    }

    /// Returns true if the index moved.
    pub fn next(&mut self) -> bool {
        if self.index + 1 < self.sections.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Returns true if the index moved.
    pub fn prev(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.sections.len()
    }

    pub fn current_key(&self) -> &str {
        self.sections
            .get(self.index)
            .map(|s| s.key.as_str())
            .unwrap_or_default()
    }

    pub fn current_title(&self) -> &str {
        self.sections
            .get(self.index)
            .map(|s| s.title.as_str())
            .unwrap_or_default()
    }

    pub fn current_body(&self) -> &str {
        self.sections
            .get(self.index)
            .map(|s| s.body.as_str())
            .unwrap_or_default()
    }

    /// One-based position and total, as shown next to the title
    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, self.sections.len())
    }
}
