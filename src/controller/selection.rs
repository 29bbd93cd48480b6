use crate::domain::types::LansiaId;

/// Rows checked in the table plus the header "select all" checkbox.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<LansiaId>,
    all_selected: bool,
}

impl SelectionSet {
    /// Selects every id of the current page, or nothing.
    pub fn toggle_all<I>(&mut self, checked: bool, page_ids: I)
    where
        I: IntoIterator<Item = LansiaId>,
    {
        self.ids.clear();
        if checked {
            for id in page_ids {
                if !self.ids.contains(&id) {
                    self.ids.push(id);
                }
            }
        }
        self.all_selected = checked;
    }

    /// Unchecking any row also unchecks "select all".
    pub fn toggle_one(&mut self, id: LansiaId, checked: bool) {
        if checked {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        } else {
            self.ids.retain(|selected| *selected != id);
            self.all_selected = false;
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.all_selected = false;
    }

    /// Selected ids in the order they were checked.
    pub fn ids(&self) -> &[LansiaId] {
        &self.ids
    }

    pub fn contains(&self, id: LansiaId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn all_selected(&self) -> bool {
        self.all_selected
    }
}
