use super::{Endpoint, Resource};
use crate::errors::{ClientError, ValidationError};
use crate::models::de::parse_date;
use crate::models::{Listing, MassProduction, MassProductionFilter};

pub struct MassProductions;

impl Resource for MassProductions {
    const PATH: &'static str = "/api/massproduction";
    const NAME: &'static str = "mass production";
    type Item = MassProduction;

    fn before_send(item: MassProduction) -> Result<MassProduction, ValidationError> {
        let opened = item.initial_request.as_deref().and_then(parse_date);
        let closed = item.closure_date.as_deref().and_then(parse_date);
        if let (Some(opened), Some(closed)) = (opened, closed)
            && closed < opened
        {
            return Err(ValidationError::InvalidValue {
                field: "closure_date".into(),
                message: format!("closure date {} is before initial request {}", closed, opened),
            });
        }
        Ok(item)
    }
}

impl Endpoint<'_, MassProductions> {
    /// `GET /api/massproduction?status=..&page=..&limit=..`
    pub async fn search(
        &self,
        filter: &MassProductionFilter,
    ) -> Result<Listing<MassProduction>, ClientError> {
        self.list_with(filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_before_request_is_rejected() {
        let mp = MassProduction {
            initial_request: Some("2024-05-10".into()),
            closure_date: Some("2024-05-01".into()),
            ..MassProduction::default()
        };
        let err = MassProductions::before_send(mp).unwrap_err();
        assert_eq!(err.field(), Some("closure_date"));
    }

    #[test]
    fn test_dates_in_order_pass() {
        let mp = MassProduction {
            initial_request: Some("2024-05-01T00:00:00.000Z".into()),
            closure_date: Some("2024-09-01".into()),
            ..MassProduction::default()
        };
        assert!(MassProductions::before_send(mp).is_ok());
        assert!(MassProductions::before_send(MassProduction::default()).is_ok());
    }
}
