//! Host types shared by the unit tests.

use alloc::{string::String, vec::Vec};

use crate::udt::Udt;

#[derive(Debug, Clone, PartialEq, Udt)]
#[udt(crate = "crate", name = "HR.ADDRESS")]
pub(crate) struct Address {
    pub(crate) street: String,
    pub(crate) zip: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Udt)]
#[udt(crate = "crate", name = "hr.phone | hr.phone_tbl")]
pub(crate) struct Phone {
    pub(crate) number: String,
}

#[derive(Debug, Clone, PartialEq, Udt)]
#[udt(crate = "crate", name = "HR.EMP|HR.EMP_TBL")]
pub(crate) struct Employee {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) address: Option<Address>,
    pub(crate) phones: Vec<Phone>,
}

pub(crate) fn employee() -> Employee {
    Employee {
        id: 7,
        name: String::from("Ada"),
        address: Some(Address {
            street: String::from("Main St"),
            zip: None,
        }),
        phones: alloc::vec![
            Phone {
                number: String::from("555-0100"),
            },
            Phone {
                number: String::from("555-0199"),
            },
        ],
    }
}
