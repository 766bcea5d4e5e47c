//! Active attenuation along a cast.

/// Per-distance attenuation rates of every object the cast is currently inside.
///
/// Entrances push, exits remove the most recent matching entry. The bottom
/// entry may be a range falloff that applies everywhere along the cast.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NerfStack {
    entries: Vec<f32>,
}

impl NerfStack {
    /// An empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// A stack seeded with a range falloff rate.
    pub fn with_range_falloff(falloff: f32) -> Self {
        Self {
            entries: vec![falloff],
        }
    }

    /// Push the rate of an entered object.
    pub fn push(&mut self, nerf: f32) {
        self.entries.push(nerf);
    }

    /// Remove the most recently pushed entry equal to `nerf`.
    ///
    /// Returns false and leaves the stack alone if there is none.
    pub fn remove_last_matching(&mut self, nerf: f32) -> bool {
        match self.entries.iter().rposition(|entry| *entry == nerf) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Total attenuation per unit distance.
    pub fn total(&self) -> f32 {
        self.entries.iter().sum()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is attenuating.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from bottom to top.
    pub fn as_slice(&self) -> &[f32] {
        &self.entries
    }
}
