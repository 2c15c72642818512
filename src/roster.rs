/// Number of seats in a lesson
pub const SEATS: u32 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: u32,
    pub name: String,
    /// Character counts measured during the lesson; carried but not yet shown
    pub results: Vec<f64>,
}

/// Fixed list of seats whose display names the instructor fills in
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    students: Vec<Student>,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    pub fn new() -> Self {
        Self {
            students: (1..=SEATS)
                .map(|id| Student {
                    id,
                    name: String::new(),
                    results: Vec::new(),
                })
                .collect(),
        }
    }

    /// Unknown ids are ignored; names are taken as given.
    pub fn rename(&mut self, id: u32, name: impl Into<String>) {
        if let Some(student) = self.students.iter_mut().find(|s| s.id == id) {
            student.name = name.into();
        }
    }

    pub fn get(&self, id: u32) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}
