//! String-keyed nerve abstraction over the grown activation array.
//!
//! The sensor layer writes input activations by name ("Red", "Energy")
//! and the motor layer reads output activations by name ("Eat", "Mate")
//! without knowing which runtime variant grew the brain.

use std::collections::HashMap;

/// One named nerve: a contiguous activation index range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nerve {
    pub name: String,
    /// First neuron index of this nerve.
    pub start: usize,
    /// Number of neurons.
    pub count: usize,
}

impl Nerve {
    /// Neuron indices covered by this nerve.
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.count
    }
}

/// All named nerves of one grown brain.
#[derive(Clone, Debug, Default)]
pub struct NerveSet {
    inputs: Vec<Nerve>,
    outputs: Vec<Nerve>,
    by_name: HashMap<String, (bool, usize)>,
}

impl NerveSet {
    pub fn add_input(&mut self, name: &str, start: usize, count: usize) {
        self.by_name
            .insert(name.to_string(), (true, self.inputs.len()));
        self.inputs.push(Nerve {
            name: name.to_string(),
            start,
            count,
        });
    }

    pub fn add_output(&mut self, name: &str, start: usize, count: usize) {
        self.by_name
            .insert(name.to_string(), (false, self.outputs.len()));
        self.outputs.push(Nerve {
            name: name.to_string(),
            start,
            count,
        });
    }

    /// Look up a nerve by name; input and output namespaces are shared.
    #[must_use]
    pub fn nerve(&self, name: &str) -> Option<&Nerve> {
        self.by_name.get(name).map(|&(input, idx)| {
            if input {
                &self.inputs[idx]
            } else {
                &self.outputs[idx]
            }
        })
    }

    /// Input nerves in slot order.
    #[must_use]
    pub fn inputs(&self) -> &[Nerve] {
        &self.inputs
    }

    /// Output nerves in slot order.
    #[must_use]
    pub fn outputs(&self) -> &[Nerve] {
        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        let mut nerves = NerveSet::default();
        nerves.add_input("Red", 2, 3);
        nerves.add_output("Eat", 5, 1);

        let red = nerves.nerve("Red").unwrap();
        assert_eq!(red.indices(), 2..5);
        assert_eq!(nerves.nerve("Eat").unwrap().start, 5);
        assert!(nerves.nerve("Taste").is_none());
        assert_eq!(nerves.inputs().len(), 1);
        assert_eq!(nerves.outputs().len(), 1);
    }
}
