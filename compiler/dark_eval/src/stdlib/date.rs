use chrono::Utc;
use dark_ir::DType;
use dark_value::Dval;

use super::pure;
use crate::registry::{BuiltinError, Function, Previewable};

pub(super) fn fns() -> Vec<Function> {
    vec![pure("Date", "now", 0, vec![], DType::TDate, "Returns the current time", now)
        .with_previewable(Previewable::ImpurePreviewable)]
}

fn now(_args: &[Dval]) -> Result<Dval, BuiltinError> {
    Ok(Dval::date(Utc::now().naive_utc()))
}
