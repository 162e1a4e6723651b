use std::{cell::RefCell, collections::HashMap, rc::Rc};

use super::error::EnvironmentError;
use super::value::Value;

pub type Env = Rc<RefCell<Environment>>;

/// One variable scope. Child scopes hold their parent by shared reference,
/// so a parent lives at least as long as any scope created inside it.
#[derive(Default, Debug)]
pub struct Environment {
    store: HashMap<String, Value>,
    parent: Option<Env>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> Env {
        Rc::new(RefCell::new(self))
    }

    pub fn new_enclosed(parent: &Env) -> Env {
        Self {
            store: HashMap::new(),
            parent: Some(Rc::clone(parent)),
        }.shared()
    }

    pub fn parent(&self) -> Option<Env> {
        self.parent.clone()
    }

    /// Creates or overwrites a binding in this scope only.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.store.insert(name.into(), value);
    }

    /// Updates the nearest enclosing binding of `name`.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), EnvironmentError> {
        if let Some(slot) = self.store.get_mut(name) {
            *slot = value;
            return Ok(());
        }

        match &self.parent {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => Err(EnvironmentError::Undefined { name: name.to_string() }),
        }
    }

    pub fn get(&self, name: &str) -> Result<Value, EnvironmentError> {
        if let Some(value) = self.store.get(name) {
            return Ok(value.clone());
        }

        match &self.parent {
            Some(parent) => parent.borrow().get(name),
            None => Err(EnvironmentError::Undefined { name: name.to_string() }),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.store.contains_key(name)
            || self.parent.as_ref().is_some_and(|parent| parent.borrow().has(name))
    }

    /// Removes `name` from the scope that defines it.
    pub fn delete(&mut self, name: &str) -> Result<Value, EnvironmentError> {
        if let Some(value) = self.store.remove(name) {
            return Ok(value);
        }

        match &self.parent {
            Some(parent) => parent.borrow_mut().delete(name),
            None => Err(EnvironmentError::Undefined { name: name.to_string() }),
        }
    }

    /// Every visible binding; inner scopes shadow outer ones.
    pub fn get_all_vars(&self) -> HashMap<String, Value> {
        let mut vars = match &self.parent {
            Some(parent) => parent.borrow().get_all_vars(),
            None => HashMap::new(),
        };

        vars.extend(self.store.iter().map(|(name, value)| (name.clone(), value.clone())));
        vars
    }
}
