mod aggregator;

use crate::{
    error::{ErrorOrigin, InternalError},
    executor::{OpIterator, TupleIterator, drain},
    model::{Schema, Tuple},
    value::{FieldType, Value},
};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    sync::Arc,
};

pub(super) const NAME: usize = 0;
pub(super) const DEPT: usize = 1;
pub(super) const SALARY: usize = 2;

pub(super) fn staff_schema() -> Arc<Schema> {
    Arc::new(Schema::from_pairs([
        ("name", FieldType::Text),
        ("dept", FieldType::Text),
        ("salary", FieldType::Int),
    ]))
}

pub(super) fn staff_row(name: &str, dept: &str, salary: i64) -> Vec<Value> {
    vec![Value::from(name), Value::from(dept), Value::Int(salary)]
}

pub(super) fn staff_rows() -> Vec<Vec<Value>> {
    vec![
        staff_row("ada", "eng", 100),
        staff_row("bo", "sales", 200),
        staff_row("cy", "eng", 300),
    ]
}

pub(super) fn staff_tuple(name: &str, dept: &str, salary: i64) -> Tuple {
    Tuple::new(staff_schema(), staff_row(name, dept, salary)).expect("valid staff tuple")
}

pub(super) fn staff_source() -> Box<dyn OpIterator> {
    Box::new(TupleIterator::from_rows(staff_schema(), staff_rows()).expect("valid staff rows"))
}

/// Collect every output row of an opened iterator as raw values.
pub(super) fn rows_of(iter: &mut dyn OpIterator) -> Vec<Vec<Value>> {
    drain(iter)
        .expect("drain should succeed")
        .into_iter()
        .map(Tuple::into_values)
        .collect()
}

pub(super) fn text(value: &str) -> Value {
    Value::from(value)
}

///
/// SourceFault
///

#[derive(Clone, Copy, Debug)]
pub(super) enum SourceFault {
    DataAccess,
    TransactionAborted,
}

impl SourceFault {
    fn raise(self) -> InternalError {
        match self {
            Self::DataAccess => InternalError::data_access("page read failed"),
            Self::TransactionAborted => InternalError::transaction_aborted("query cancelled"),
        }
    }
}

///
/// SourceTracker
///
/// Lifecycle observations shared between a test and its scripted source.
///

#[derive(Debug, Default)]
pub(super) struct SourceTracker {
    pub opens: Cell<usize>,
    pub closes: Cell<usize>,
    pub open: Cell<bool>,
    pub fail_after: Cell<Option<(usize, SourceFault)>>,
}

///
/// ScriptedSource
///
/// Child iterator over shared rows with an optional injected fault, used to
/// observe how the operator drives its child.
///

pub(super) struct ScriptedSource {
    schema: Arc<Schema>,
    rows: Rc<RefCell<Vec<Vec<Value>>>>,
    fail_on_open: Option<SourceFault>,
    tracker: Rc<SourceTracker>,
    position: usize,
}

impl ScriptedSource {
    pub(super) fn new(schema: Arc<Schema>, rows: Rc<RefCell<Vec<Vec<Value>>>>) -> Self {
        Self {
            schema,
            rows,
            fail_on_open: None,
            tracker: Rc::new(SourceTracker::default()),
            position: 0,
        }
    }

    pub(super) fn staff() -> Self {
        Self::new(staff_schema(), Rc::new(RefCell::new(staff_rows())))
    }

    pub(super) const fn failing_on_open(mut self, fault: SourceFault) -> Self {
        self.fail_on_open = Some(fault);
        self
    }

    pub(super) fn failing_after(self, rows: usize, fault: SourceFault) -> Self {
        self.tracker.fail_after.set(Some((rows, fault)));
        self
    }

    pub(super) fn tracker(&self) -> Rc<SourceTracker> {
        Rc::clone(&self.tracker)
    }

    fn ensure_open(&self) -> Result<(), InternalError> {
        if self.tracker.open.get() {
            return Ok(());
        }

        Err(InternalError::state(
            ErrorOrigin::Source,
            "scripted source is closed",
        ))
    }
}

impl OpIterator for ScriptedSource {
    fn open(&mut self) -> Result<(), InternalError> {
        if self.tracker.open.get() {
            return Err(InternalError::state(
                ErrorOrigin::Source,
                "scripted source already open",
            ));
        }
        self.tracker.opens.set(self.tracker.opens.get() + 1);
        if let Some(fault) = self.fail_on_open {
            return Err(fault.raise());
        }
        self.tracker.open.set(true);
        self.position = 0;

        Ok(())
    }

    fn has_next(&mut self) -> Result<bool, InternalError> {
        self.ensure_open()?;
        if let Some((after, fault)) = self.tracker.fail_after.get()
            && self.position >= after
        {
            return Err(fault.raise());
        }

        Ok(self.position < self.rows.borrow().len())
    }

    fn next(&mut self) -> Result<Tuple, InternalError> {
        if !self.has_next()? {
            return Err(InternalError::no_such_element(ErrorOrigin::Source));
        }
        let values = self.rows.borrow()[self.position].clone();
        self.position += 1;

        Tuple::new(Arc::clone(&self.schema), values)
    }

    fn rewind(&mut self) -> Result<(), InternalError> {
        self.ensure_open()?;
        self.position = 0;

        Ok(())
    }

    fn close(&mut self) {
        if self.tracker.open.replace(false) {
            self.tracker.closes.set(self.tracker.closes.get() + 1);
        }
    }

    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }
}
