//! Minimal reader for the food dataset files.

/// Splits one line into fields. A `"` toggles quoted mode and is dropped;
/// commas inside quotes are kept as text. There is no escaping.
pub fn split_row(row: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in row.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Where the interesting columns live in a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub name: usize,
    pub calories: usize,
    pub carbohydrates: usize,
    pub protein: usize,
}

impl Default for ColumnLayout {
    /// `,Unnamed: 0,food,Caloric Value,Fat,...,Carbohydrates,Sugars,Protein,...`
    fn default() -> Self {
        Self {
            name: 2,
            calories: 3,
            carbohydrates: 8,
            protein: 10,
        }
    }
}

impl ColumnLayout {
    /// Reads column positions from a header row. Falls back to the default
    /// layout unless all four columns are named.
    pub fn from_header(header: &str) -> Self {
        let columns: Vec<String> = split_row(header)
            .iter()
            .map(|c| c.trim().to_lowercase())
            .collect();
        let find = |name: &str| columns.iter().position(|c| c == name);

        match (
            find("food"),
            find("caloric value"),
            find("carbohydrates"),
            find("protein"),
        ) {
            (Some(name), Some(calories), Some(carbohydrates), Some(protein)) => Self {
                name,
                calories,
                carbohydrates,
                protein,
            },
            _ => Self::default(),
        }
    }

    /// Number of fields a row needs for every column to be present.
    pub fn min_fields(&self) -> usize {
        self.name
            .max(self.calories)
            .max(self.carbohydrates)
            .max(self.protein)
            + 1
    }
}

/// `"chicken breast"` -> `"Chicken Breast"`. A word starts after any
/// character that is not a letter or digit, so `"bread (white)"` becomes
/// `"Bread (White)"`.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
