//! Fully-bound collection of the model's tables and switches.

use w2_core::Real;

use crate::{FunctionError, FunctionResult, SwitchFunction, SwitchName, TableFunction, TableName};

/// Accumulates tables and switches by name.
#[derive(Debug, Clone)]
pub struct FunctionSetBuilder {
    tables: Vec<Option<TableFunction>>,
    switches: Vec<Option<SwitchFunction>>,
}

impl Default for FunctionSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionSetBuilder {
    pub fn new() -> Self {
        Self {
            tables: vec![None; TableName::COUNT],
            switches: vec![None; SwitchName::COUNT],
        }
    }

    /// Bind a table; binding the same name twice is an error.
    pub fn bind_table(&mut self, table: TableFunction) -> FunctionResult<&mut Self> {
        let slot = &mut self.tables[table.name().index()];
        if slot.is_some() {
            return Err(FunctionError::DuplicateName {
                kind: "table",
                name: table.name().code().to_string(),
            });
        }
        *slot = Some(table);
        Ok(self)
    }

    /// Bind a switch; binding the same name twice is an error.
    pub fn bind_switch(&mut self, switch: SwitchFunction) -> FunctionResult<&mut Self> {
        let slot = &mut self.switches[switch.name().index()];
        if slot.is_some() {
            return Err(FunctionError::DuplicateName {
                kind: "switch",
                name: switch.name().code().to_string(),
            });
        }
        *slot = Some(switch);
        Ok(self)
    }

    pub fn bind_tables(
        &mut self,
        tables: impl IntoIterator<Item = TableFunction>,
    ) -> FunctionResult<&mut Self> {
        for table in tables {
            self.bind_table(table)?;
        }
        Ok(self)
    }

    pub fn bind_switches(
        &mut self,
        switches: impl IntoIterator<Item = SwitchFunction>,
    ) -> FunctionResult<&mut Self> {
        for switch in switches {
            self.bind_switch(switch)?;
        }
        Ok(self)
    }

    /// Table names not bound yet, in [`TableName::ALL`] order.
    pub fn missing_tables(&self) -> Vec<TableName> {
        TableName::ALL
            .into_iter()
            .filter(|name| self.tables[name.index()].is_none())
            .collect()
    }

    /// Switch names not bound yet, in [`SwitchName::ALL`] order.
    pub fn missing_switches(&self) -> Vec<SwitchName> {
        SwitchName::ALL
            .into_iter()
            .filter(|name| self.switches[name.index()].is_none())
            .collect()
    }

    /// Finish binding. Fails on the first unbound table, then switch.
    pub fn build(self) -> FunctionResult<FunctionSet> {
        if let Some(name) = self.missing_tables().first() {
            return Err(FunctionError::Unbound {
                kind: "table",
                name: name.code().to_string(),
            });
        }
        if let Some(name) = self.missing_switches().first() {
            return Err(FunctionError::Unbound {
                kind: "switch",
                name: name.code().to_string(),
            });
        }

        Ok(FunctionSet {
            tables: self.tables.into_iter().flatten().collect(),
            switches: self.switches.into_iter().flatten().collect(),
        })
    }
}

/// Every table and switch the engine evaluates, resolved and immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSet {
    // Indexed by TableName::index / SwitchName::index.
    tables: Vec<TableFunction>,
    switches: Vec<SwitchFunction>,
}

impl FunctionSet {
    pub fn builder() -> FunctionSetBuilder {
        FunctionSetBuilder::new()
    }

    pub fn table(&self, name: TableName) -> &TableFunction {
        &self.tables[name.index()]
    }

    pub fn switch(&self, name: SwitchName) -> &SwitchFunction {
        &self.switches[name.index()]
    }

    /// Evaluate table `name` at `x`.
    pub fn lookup(&self, name: TableName, x: Real) -> Real {
        self.table(name).evaluate(x)
    }

    /// Evaluate switch `name` at time `t`.
    pub fn at(&self, name: SwitchName, t: Real) -> Real {
        self.switch(name).evaluate(t)
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableFunction> {
        self.tables.iter()
    }

    pub fn switches(&self) -> impl Iterator<Item = &SwitchFunction> {
        self.switches.iter()
    }

    /// Copy of this set with one switch replaced.
    pub fn with_switch(&self, switch: SwitchFunction) -> Self {
        let mut next = self.clone();
        next.switches[switch.name().index()] = switch;
        next
    }

    /// Copy of this set with one table replaced.
    pub fn with_table(&self, table: TableFunction) -> Self {
        let mut next = self.clone();
        let index = table.name().index();
        next.tables[index] = table;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_table(name: TableName) -> TableFunction {
        TableFunction::new(name, vec![0.0, 1.0], vec![1.0, 1.0]).unwrap()
    }

    fn flat_switch(name: SwitchName) -> SwitchFunction {
        SwitchFunction::constant(name, 1.0, 1970.0).unwrap()
    }

    fn full_builder() -> FunctionSetBuilder {
        let mut builder = FunctionSet::builder();
        builder
            .bind_tables(TableName::ALL.into_iter().map(flat_table))
            .unwrap()
            .bind_switches(SwitchName::ALL.into_iter().map(flat_switch))
            .unwrap();
        builder
    }

    #[test]
    fn complete_set_builds() {
        let set = full_builder().build().unwrap();
        assert_eq!(set.tables().count(), TableName::COUNT);
        assert_eq!(set.switches().count(), SwitchName::COUNT);
        for name in TableName::ALL {
            assert_eq!(set.table(name).name(), name);
        }
        for name in SwitchName::ALL {
            assert_eq!(set.switch(name).name(), name);
        }
    }

    #[test]
    fn missing_table_is_reported_by_name() {
        let mut builder = FunctionSet::builder();
        builder
            .bind_tables(
                TableName::ALL
                    .into_iter()
                    .filter(|n| *n != TableName::Polat)
                    .map(flat_table),
            )
            .unwrap();
        assert_eq!(builder.missing_tables(), vec![TableName::Polat]);
        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            FunctionError::Unbound {
                kind: "table",
                name: "POLAT".to_string()
            }
        );
    }

    #[test]
    fn missing_switch_is_reported_by_name() {
        let mut builder = FunctionSet::builder();
        builder
            .bind_tables(TableName::ALL.into_iter().map(flat_table))
            .unwrap();
        let err = builder.build().unwrap_err();
        assert!(matches!(
            err,
            FunctionError::Unbound { kind: "switch", ref name } if name == "BRN"
        ));
    }

    #[test]
    fn duplicate_binding_is_rejected() {
        let mut builder = full_builder();
        let err = builder.bind_switch(flat_switch(SwitchName::Fc)).unwrap_err();
        assert!(matches!(err, FunctionError::DuplicateName { kind: "switch", .. }));
    }

    #[test]
    fn with_switch_replaces_only_that_switch() {
        let set = full_builder().build().unwrap();
        let policy = SwitchFunction::new(SwitchName::Nrun, 1.0, 0.25, 1970.0).unwrap();
        let next = set.with_switch(policy);
        assert_eq!(next.at(SwitchName::Nrun, 2000.0), 0.25);
        assert_eq!(set.at(SwitchName::Nrun, 2000.0), 1.0);
        assert_eq!(next.switch(SwitchName::Brn), set.switch(SwitchName::Brn));
    }
}
