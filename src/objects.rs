use crate::table::Table;
use std::fmt;
use std::rc::Rc;

/// All types of values in SIMPL.
#[derive(Clone, Debug)]
pub enum Value {
    Bool(bool),
    Nil,
    Number(f64),
    Obj(Object),
}

/// All types of heap-allocated objects in SIMPL.
#[derive(Clone, Debug)]
pub enum Object {
    Str(Rc<str>),
}

impl Value {
    pub fn is_number(&self) -> bool {
        match self {
            Value::Number(_) => true,
            _ => false,
        }
    }

    pub fn is_string(&self) -> bool {
        match self {
            Value::Obj(Object::Str(_)) => true,
            _ => false,
        }
    }

    /// Only `nil` and `false` are falsey; every other value (including
    /// zero and the empty string) is truthy.
    pub fn is_falsey(&self) -> bool {
        match self {
            Value::Nil => true,
            Value::Bool(val) => !val,
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            // Interning guarantees equal contents share one allocation,
            // so string equality is handle identity.
            (Value::Obj(Object::Str(a)), Value::Obj(Object::Str(b))) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(val) => write!(f, "{}", val),
            Value::Nil => write!(f, "nil"),
            Value::Number(num) => write!(f, "{}", num),
            Value::Obj(Object::Str(string)) => write!(f, "{}", string),
        }
    }
}

/// Owns every heap allocation made by the compiler and the VM: the
/// string intern pool and the list of live objects.
pub struct Heap {
    /// Intern pool keyed by string contents; the stored values are
    /// always `Nil`.
    strings: Table,
    /// Every live object in allocation order, for a future collector.
    objects: Vec<Object>,
}

impl Heap {
    /// Creates an empty heap.
    pub fn new() -> Self {
        Heap {
            strings: Table::new(),
            objects: Vec::new(),
        }
    }

    /// Returns the canonical string object for the given contents,
    /// allocating one only when no equal string has been seen before.
    /// The membership check runs on the raw bytes, so re-interning never
    /// allocates.
    pub fn intern(&mut self, contents: &str) -> Rc<str> {
        let hash = self.strings.hash_of(contents);

        if let Some(existing) = self.strings.find_with_hash(contents, hash) {
            return existing;
        }

        let string: Rc<str> = Rc::from(contents);
        self.strings.set(string.clone(), Value::Nil);
        self.objects.push(Object::Str(string.clone()));

        string
    }

    /// The number of objects currently tracked by the heap.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}
