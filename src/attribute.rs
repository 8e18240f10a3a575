//! Builds the global- and variable-scoped attribute catalogues from a file's Attribute
//! Descriptor Records, splitting them by scope and indexing each attribute's g- and z-entry
//! lists by entry number.

use crate::record::adr::AttributeDescriptorRecord;
use crate::record::agredr::AttributeGREntryDescriptorRecord;
use crate::record::azedr::AttributeZEntryDescriptorRecord;
use crate::types::{CdfString, CdfType};
use crate::variable::Variable;

/// A global-scoped attribute: one value list shared across the whole file, combining its
/// g-entries (in declared-entry order) followed by its z-entries.
pub struct GlobalAttribute {
    name: CdfString,
    entries: Vec<Option<Vec<CdfType>>>,
}

impl GlobalAttribute {
    /// The attribute's name.
    pub fn name(&self) -> &CdfString {
        &self.name
    }

    /// This attribute's entries, g-entries then z-entries, indexed by entry number; a `None`
    /// slot means no entry was stored at that index.
    pub fn entries(&self) -> &[Option<Vec<CdfType>>] {
        &self.entries
    }
}

/// A variable-scoped attribute: a per-variable value, looked up by the target variable's own
/// number within its r- or z- list.
pub struct VariableAttribute {
    name: CdfString,
    g_entries: Vec<Option<Vec<CdfType>>>,
    z_entries: Vec<Option<Vec<CdfType>>>,
}

impl VariableAttribute {
    /// The attribute's name.
    pub fn name(&self) -> &CdfString {
        &self.name
    }

    /// This attribute's entry for `variable`, if one was stored. Dispatches on whether
    /// `variable` is a z-variable to pick the right entry list, then looks it up by
    /// `variable.num()`.
    pub fn entry(&self, variable: &Variable) -> Option<&Vec<CdfType>> {
        let list = if variable.is_z_variable() {
            &self.z_entries
        } else {
            &self.g_entries
        };
        usize::try_from(variable.num())
            .ok()
            .and_then(|i| list.get(i))
            .and_then(|entry| entry.as_ref())
    }
}

/// Splits a file's Attribute Descriptor Records into global and variable-scoped attributes by
/// the odd/even convention of the `scope` field (1/3 = global, 2/4 = variable-scoped).
pub fn build_attributes(
    adr_vec: Vec<AttributeDescriptorRecord>,
) -> (Vec<GlobalAttribute>, Vec<VariableAttribute>) {
    let mut globals = Vec::new();
    let mut variables = Vec::new();

    for adr in adr_vec {
        let is_global = *adr.scope % 2 == 1;
        let g_entries = walk_gr_entries(&adr.agredr_vec, *adr.max_gr_entry);
        let z_entries = walk_z_entries(&adr.azedr_vec, *adr.max_z_entry);

        if is_global {
            let mut entries = g_entries;
            entries.extend(z_entries);
            globals.push(GlobalAttribute {
                name: adr.name,
                entries,
            });
        } else {
            variables.push(VariableAttribute {
                name: adr.name,
                g_entries,
                z_entries,
            });
        }
    }

    (globals, variables)
}

fn walk_gr_entries(
    agredr_vec: &[AttributeGREntryDescriptorRecord],
    max_entry: i32,
) -> Vec<Option<Vec<CdfType>>> {
    let len = usize::try_from(max_entry + 1).unwrap_or(0);
    let mut slots: Vec<Option<Vec<CdfType>>> = vec![None; len];
    for entry in agredr_vec {
        if let Ok(i) = usize::try_from(*entry.num) {
            if i < slots.len() {
                slots[i] = Some(entry.value.clone());
            }
        }
    }
    slots
}

fn walk_z_entries(
    azedr_vec: &[AttributeZEntryDescriptorRecord],
    max_entry: i32,
) -> Vec<Option<Vec<CdfType>>> {
    let len = usize::try_from(max_entry + 1).unwrap_or(0);
    let mut slots: Vec<Option<Vec<CdfType>>> = vec![None; len];
    for entry in azedr_vec {
        if let Ok(i) = usize::try_from(*entry.num) {
            if i < slots.len() {
                slots[i] = Some(entry.value.clone());
            }
        }
    }
    slots
}
