use std::{cell::RefCell, cmp::Ordering, rc::Rc};

use crate::{
    environment::prelude::Value,
    parser::prelude::{
        Binary, BinaryOperator, Call, Expression, Identifier, Index, MethodCall, Property, Set,
        Template, Unary, UnaryOperator,
    },
    utils::prelude::Position,
};
use super::error::RuntimeErrorKind;
use super::interpreter::{ExecResult, Interpreter};

const LENGTH: &str = "LÄNGE";
const PREPEND: &str = "HINZUFÜGEN";
const APPEND: &str = "ERWEITERN";

impl Interpreter {
    pub fn evaluate(&mut self, expression: &Expression) -> ExecResult<Value> {
        match expression {
            Expression::Literal(literal) => Ok(Value::from(&literal.value)),
            Expression::Identifier(identifier) => self.lookup(identifier),
            Expression::Binary(binary) => self.evaluate_binary(binary),
            Expression::Unary(unary) => self.evaluate_unary(unary),
            Expression::Call(call) => self.evaluate_call(call),
            Expression::Array(array) => {
                let elements = self.evaluate_all(&array.elements)?;
                Ok(Value::array(elements))
            },
            Expression::Index(index) => self.evaluate_index(index),
            Expression::Property(property) => self.evaluate_property(property),
            Expression::MethodCall(call) => self.evaluate_method_call(call),
            Expression::Set(set) => self.evaluate_set(set),
            Expression::Template(template) => self.evaluate_template(template),
        }
    }

    fn evaluate_all(&mut self, expressions: &[Expression]) -> ExecResult<Vec<Value>> {
        expressions.iter()
            .map(|expression| self.evaluate(expression))
            .collect()
    }

    /// Variables first; a bare function name evaluates to the function itself.
    fn lookup(&self, identifier: &Identifier) -> ExecResult<Value> {
        let bound = self.env.borrow().get(&identifier.name);

        match bound {
            Ok(value) => Ok(value),
            Err(_) => match self.function(&identifier.name) {
                Some(function) => Ok(Value::Function(function)),
                None => Err(self.error(
                    RuntimeErrorKind::UndefinedVariable { name: identifier.name.clone() },
                    identifier.position,
                )),
            },
        }
    }

    fn evaluate_binary(&mut self, binary: &Binary) -> ExecResult<Value> {
        let left = self.evaluate(&binary.left)?;

        match binary.operator {
            BinaryOperator::And if !left.is_truthy() => return Ok(Value::Boolean(false)),
            BinaryOperator::Or if left.is_truthy() => return Ok(Value::Boolean(true)),
            BinaryOperator::And | BinaryOperator::Or => {
                let right = self.evaluate(&binary.right)?;
                return Ok(Value::Boolean(right.is_truthy()));
            },
            _ => {}
        }

        let right = self.evaluate(&binary.right)?;

        binary_operation(binary.operator, &left, &right)
            .map_err(|kind| self.error(kind, binary.position))
    }

    fn evaluate_unary(&mut self, unary: &Unary) -> ExecResult<Value> {
        let operand = self.evaluate(&unary.operand)?;

        let result = match (unary.operator, &operand) {
            (UnaryOperator::Not, operand) => Ok(Value::Boolean(!operand.is_truthy())),
            (UnaryOperator::Negate, Value::Integer(value)) => value.checked_neg()
                .map(Value::Integer)
                .ok_or_else(|| RuntimeErrorKind::IntegerOverflow { operator: "-".into() }),
            (UnaryOperator::Negate, Value::Float(value)) => Ok(Value::Float(-value)),
            (operator, operand) => Err(RuntimeErrorKind::UnaryTypeMismatch {
                operator: operator.to_string(),
                operand: operand.type_name(),
            }),
        };

        result.map_err(|kind| self.error(kind, unary.position))
    }

    fn evaluate_call(&mut self, call: &Call) -> ExecResult<Value> {
        let identifier = match call.callee.as_ref() {
            Expression::Identifier(identifier) => identifier,
            callee => {
                let callee = self.evaluate(callee)?;
                let arguments = self.evaluate_all(&call.arguments)?;
                return self.call_value(callee, arguments, call.position);
            }
        };

        let arguments = self.evaluate_all(&call.arguments)?;
        let bound = self.env.borrow().get(&identifier.name).ok();

        if let Some(callee) = bound.as_ref().filter(|value| value.is_callable()) {
            return self.call_value(callee.clone(), arguments, call.position);
        }

        if let Some(function) = self.function(&identifier.name) {
            return self.call_function(&function, arguments, call.position);
        }

        let kind = match bound {
            Some(value) => RuntimeErrorKind::NotCallable { got: value.type_name() },
            None => RuntimeErrorKind::UndefinedFunction { name: identifier.name.clone() },
        };

        Err(self.error(kind, call.position))
    }

    fn expect_array(&self, value: &Value, position: Position) -> ExecResult<Rc<RefCell<Vec<Value>>>> {
        match value {
            Value::Array(elements) => Ok(Rc::clone(elements)),
            other => Err(self.error(RuntimeErrorKind::NotAnArray { got: other.type_name() }, position)),
        }
    }

    fn element_slot(&self, key: &Value, length: usize, position: Position) -> ExecResult<usize> {
        let index = index_of(key).map_err(|kind| self.error(kind, position))?;

        match usize::try_from(index) {
            Ok(slot) if slot < length => Ok(slot),
            _ => Err(self.error(RuntimeErrorKind::IndexOutOfBounds { index, length }, position)),
        }
    }

    fn evaluate_index(&mut self, index: &Index) -> ExecResult<Value> {
        let target = self.evaluate(&index.array)?;
        let key = self.evaluate(&index.index)?;

        let elements = self.expect_array(&target, index.position)?;
        let slot = self.element_slot(&key, elements.borrow().len(), index.position)?;

        let element = elements.borrow()[slot].clone();
        Ok(element)
    }

    fn evaluate_property(&mut self, property: &Property) -> ExecResult<Value> {
        let object = self.evaluate(&property.object)?;

        let length = match (&object, property.name.as_str()) {
            (Value::Array(elements), LENGTH) => elements.borrow().len(),
            (Value::String(text), LENGTH) => text.chars().count(),
            (object, name) => return Err(self.error(
                RuntimeErrorKind::UnknownProperty {
                    name: name.to_string(),
                    receiver: object.type_name(),
                },
                property.position,
            )),
        };

        Ok(Value::Integer(length as i64))
    }

    fn evaluate_method_call(&mut self, call: &MethodCall) -> ExecResult<Value> {
        let object = self.evaluate(&call.object)?;
        let arguments = self.evaluate_all(&call.arguments)?;

        match (&object, call.method.as_str()) {
            (Value::Array(elements), PREPEND) => {
                let mut elements = elements.borrow_mut();
                for argument in arguments {
                    elements.insert(0, argument);
                }
            },
            (Value::Array(elements), APPEND) => {
                elements.borrow_mut().extend(arguments);
            },
            (object, method) => return Err(self.error(
                RuntimeErrorKind::UnknownMethod {
                    name: method.to_string(),
                    receiver: object.type_name(),
                },
                call.position,
            )),
        }

        Ok(Value::Null)
    }

    fn evaluate_set(&mut self, set: &Set) -> ExecResult<Value> {
        let value = self.evaluate(&set.value)?;

        match set.target.as_ref() {
            Expression::Identifier(identifier) => {
                self.assign(identifier, value.clone())?;
            },
            Expression::Index(index) => {
                let target = self.evaluate(&index.array)?;
                let key = self.evaluate(&index.index)?;

                let elements = self.expect_array(&target, index.position)?;
                let slot = self.element_slot(&key, elements.borrow().len(), index.position)?;

                elements.borrow_mut()[slot] = value.clone();
            },
            // objects do not exist yet, so there is nothing to store into
            Expression::Property(property) => {
                self.evaluate(&property.object)?;
            },
            _ => return Err(self.error(RuntimeErrorKind::InvalidAssignmentTarget, set.position)),
        }

        Ok(value)
    }

    fn evaluate_template(&mut self, template: &Template) -> ExecResult<Value> {
        let mut text = String::new();

        for (idx, part) in template.parts.iter().enumerate() {
            text.push_str(part);

            if let Some(expression) = template.expressions.get(idx) {
                let value = self.evaluate(expression)?;
                text.push_str(&value.to_string());
            }
        }

        Ok(Value::String(text))
    }
}

fn type_mismatch(operator: BinaryOperator, left: &Value, right: &Value) -> RuntimeErrorKind {
    RuntimeErrorKind::TypeMismatch {
        operator: operator.to_string(),
        left: left.type_name(),
        right: right.type_name(),
    }
}

fn overflow(operator: BinaryOperator) -> RuntimeErrorKind {
    RuntimeErrorKind::IntegerOverflow { operator: operator.to_string() }
}

fn checked(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
    integer: fn(i64, i64) -> Option<i64>,
    float: fn(f64, f64) -> f64,
) -> Result<Value, RuntimeErrorKind> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => integer(*a, *b)
            .map(Value::Integer)
            .ok_or_else(|| overflow(operator)),
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => Ok(Value::Float(float(a, b))),
            _ => Err(type_mismatch(operator, left, right)),
        },
    }
}

/// Floored remainder: the result takes the sign of the divisor.
fn floored_rem(a: i64, b: i64) -> Option<i64> {
    let rem = a.checked_rem(b)?;

    if rem != 0 && (rem < 0) != (b < 0) {
        rem.checked_add(b)
    } else {
        Some(rem)
    }
}

fn floored_rem_f64(a: f64, b: f64) -> f64 {
    let rem = a % b;

    if rem != 0.0 && (rem < 0.0) != (b < 0.0) {
        rem + b
    } else {
        rem
    }
}

/// `None` when the operands are unordered (a NaN is involved).
fn compare(operator: BinaryOperator, left: &Value, right: &Value) -> Result<Option<Ordering>, RuntimeErrorKind> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Some(a.cmp(b))),
        (Value::String(a), Value::String(b)) => Ok(Some(a.cmp(b))),
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => Ok(a.partial_cmp(&b)),
            _ => Err(type_mismatch(operator, left, right)),
        },
    }
}

fn relation(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
    holds: fn(Ordering) -> bool,
) -> Result<Value, RuntimeErrorKind> {
    let ordering = compare(operator, left, right)?;

    Ok(Value::Boolean(ordering.is_some_and(holds)))
}

/// Applies an operator other than the short-circuiting `&&` and `||`.
pub fn binary_operation(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeErrorKind> {
    match operator {
        BinaryOperator::Add => match (left, right) {
            (Value::String(_), _) | (_, Value::String(_)) => {
                Ok(Value::String(format!("{left}{right}")))
            },
            (Value::Array(a), Value::Array(b)) => {
                let mut elements = a.borrow().clone();
                elements.extend(b.borrow().iter().cloned());
                Ok(Value::array(elements))
            },
            _ => checked(operator, left, right, i64::checked_add, |a, b| a + b),
        },
        BinaryOperator::Subtract => checked(operator, left, right, i64::checked_sub, |a, b| a - b),
        BinaryOperator::Multiply => checked(operator, left, right, i64::checked_mul, |a, b| a * b),
        BinaryOperator::Divide => match (left.as_number(), right.as_number()) {
            (Some(_), Some(b)) if b == 0.0 => Err(RuntimeErrorKind::DivisionByZero),
            (Some(a), Some(b)) => Ok(Value::Float(a / b)),
            _ => Err(type_mismatch(operator, left, right)),
        },
        BinaryOperator::Modulo => match right.as_number() {
            Some(b) if b == 0.0 && left.as_number().is_some() => Err(RuntimeErrorKind::DivisionByZero),
            _ => checked(operator, left, right, floored_rem, floored_rem_f64),
        },
        BinaryOperator::Equal => Ok(Value::Boolean(left == right)),
        BinaryOperator::NotEqual => Ok(Value::Boolean(left != right)),
        BinaryOperator::Less => relation(operator, left, right, Ordering::is_lt),
        BinaryOperator::LessEqual => relation(operator, left, right, Ordering::is_le),
        BinaryOperator::Greater => relation(operator, left, right, Ordering::is_gt),
        BinaryOperator::GreaterEqual => relation(operator, left, right, Ordering::is_ge),
        BinaryOperator::And => Ok(Value::Boolean(left.is_truthy() && right.is_truthy())),
        BinaryOperator::Or => Ok(Value::Boolean(left.is_truthy() || right.is_truthy())),
    }
}

/// Integer, truncated float, boolean as 0/1, or a numeric string.
fn index_of(key: &Value) -> Result<i64, RuntimeErrorKind> {
    let not_numeric = || RuntimeErrorKind::IndexNotNumeric { got: key.type_name().to_string() };

    match key {
        Value::Integer(index) => Ok(*index),
        Value::Float(index) if index.is_finite() => Ok(index.trunc() as i64),
        Value::Boolean(flag) => Ok(i64::from(*flag)),
        Value::String(text) => {
            let text = text.trim();

            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().filter(|n| n.is_finite()).map(|n| n.trunc() as i64))
                .ok_or_else(|| RuntimeErrorKind::IndexNotNumeric { got: format!("'{text}'") })
        },
        _ => Err(not_numeric()),
    }
}
