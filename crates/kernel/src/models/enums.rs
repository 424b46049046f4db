//! Small-integer enumerations stored on entities.
//!
//! Each enum is persisted as its numeric id and exposes [`from_id`] so that
//! filter arguments can be resolved without trusting the caller's number.
//!
//! [`from_id`]: EmployeeStatus::from_id

use serde::{Deserialize, Serialize};

use crate::query::value::Value;

macro_rules! id_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident = $id:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i16", into = "i16")]
        pub enum $name {
            $($variant = $id),+
        }

        impl $name {
            /// Look up a variant by numeric id.
            pub fn from_id(id: i64) -> Option<Self> {
                match id {
                    $($id => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Numeric id.
            pub const fn id(self) -> i16 {
                self as i16
            }

            /// Resolve a numeric id straight to a predicate value.
            pub fn resolve(id: i64) -> Option<Value> {
                Self::from_id(id).map(Value::from)
            }
        }

        impl TryFrom<i16> for $name {
            type Error = String;

            fn try_from(id: i16) -> Result<Self, Self::Error> {
                Self::from_id(i64::from(id))
                    .ok_or_else(|| format!("unknown {} id {id}", stringify!($name)))
            }
        }

        impl From<$name> for i16 {
            fn from(value: $name) -> Self {
                value.id()
            }
        }

        impl From<$name> for Value {
            fn from(value: $name) -> Self {
                Value::Integer(i64::from(value.id()))
            }
        }
    };
}

id_enum! {
    /// Employment status of an employee.
    pub enum EmployeeStatus {
        Active = 0,
        Inactive = 1,
        Suspended = 2,
        Terminated = 3,
    }
}

id_enum! {
    /// A user's role within an establishment.
    pub enum MemberRole {
        Owner = 0,
        Manager = 1,
        Staff = 2,
    }
}

id_enum! {
    pub enum PhoneType {
        Landline = 0,
        Mobile = 1,
        Fax = 2,
    }
}
