//! Resources with no behavior beyond plain CRUD on `Record`.

use super::Resource;
use crate::models::Record;

pub struct ProductDesignations;

impl Resource for ProductDesignations {
    const PATH: &'static str = "/api/pd";
    const NAME: &'static str = "product designation";
    type Item = Record;
}

pub struct Facilities;

impl Resource for Facilities {
    const PATH: &'static str = "/api/facilities";
    const NAME: &'static str = "facility";
    type Item = Record;
}

pub struct KickOffs;

impl Resource for KickOffs {
    const PATH: &'static str = "/api/kickoff";
    const NAME: &'static str = "kick-off";
    type Item = Record;
}

pub struct Validations;

impl Resource for Validations {
    const PATH: &'static str = "/api/Validation";
    const NAME: &'static str = "validation";
    type Item = Record;
}

pub struct QualificationConfirmations;

impl Resource for QualificationConfirmations {
    const PATH: &'static str = "/api/qualification_confirmation";
    const NAME: &'static str = "qualification confirmation";
    type Item = Record;
}
