//! Resource API wrappers over `ApiClient`.
//!
//! Every backend resource is a zero-sized marker implementing `Resource`
//! (base path + item type). `Endpoint<R>` provides the shared CRUD
//! operations; resource-specific extras live next to each marker:
//!
//! | Module            | Resources                                           |
//! |-------------------|-----------------------------------------------------|
//! | `records`         | product designations, facilities, kick-offs,        |
//! |                   | validations, qualification confirmations            |
//! | `mass_production` | mass production projects (filter + pagination)      |
//! | `calls`           | calls (countdown, complete, check-expired, export)  |
//! | `supply`          | supply readiness (payload normalization)            |
//! | `forms`           | OK-for-launch, validation for offer (multipart)     |
//! | `users`           | users (role update)                                 |

pub mod calls;
pub mod forms;
pub mod mass_production;
pub mod records;
pub mod supply;
pub mod users;

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};

use crate::client::ApiClient;
use crate::errors::{ClientError, ValidationError};
use crate::models::{Listing, Record, User};

pub use calls::Calls;
pub use forms::{FormResource, OkForLaunch, ValidationsForOffer};
pub use mass_production::MassProductions;
pub use records::{Facilities, KickOffs, ProductDesignations, QualificationConfirmations, Validations};
pub use supply::{Supplies, normalize_details, normalize_supply_payload};
pub use users::Users;

/// A backend resource: where it lives and what it decodes to.
pub trait Resource {
    /// Base path, e.g. `/api/kickoff`.
    const PATH: &'static str;
    /// Human-readable name for messages.
    const NAME: &'static str;

    type Item: Serialize + DeserializeOwned;

    /// Validate or rewrite an item before it is sent on create/update.
    fn before_send(item: Self::Item) -> Result<Self::Item, ValidationError> {
        Ok(item)
    }

    /// Fill derived fields on every fetched item.
    fn after_fetch(_item: &mut Self::Item, _now: DateTime<Utc>) {}
}

/// CRUD operations for one resource, borrowing the shared client.
pub struct Endpoint<'a, R> {
    client: &'a ApiClient,
    _resource: PhantomData<R>,
}

impl<'a, R: Resource> Endpoint<'a, R> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    pub fn client(&self) -> &'a ApiClient {
        self.client
    }

    /// `<PATH>/<id>`, rejecting ids that would change the path.
    pub fn item_path(id: &str) -> Result<String, ValidationError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ValidationError::MissingField { field: "id".into() });
        }
        if id.contains(['/', '?', '#', '%']) || id.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidValue {
                field: "id".into(),
                message: format!("'{}' is not a valid {} id", id, R::NAME),
            });
        }
        Ok(format!("{}/{}", R::PATH, id))
    }

    pub async fn list(&self) -> Result<Vec<R::Item>, ClientError> {
        let listing: Listing<R::Item> = self.client.get(R::PATH).await?;
        let mut items = listing.into_items();
        let now = Utc::now();
        for item in &mut items {
            R::after_fetch(item, now);
        }
        Ok(items)
    }

    /// List with a query-string filter; keeps the pagination envelope.
    pub async fn list_with<Q>(&self, query: &Q) -> Result<Listing<R::Item>, ClientError>
    where
        Q: Serialize + ?Sized,
    {
        let mut listing: Listing<R::Item> = self.client.get_with(R::PATH, query).await?;
        let now = Utc::now();
        for item in listing.items_mut() {
            R::after_fetch(item, now);
        }
        Ok(listing)
    }

    pub async fn get(&self, id: &str) -> Result<R::Item, ClientError> {
        let path = Self::item_path(id)?;
        let mut item: R::Item = self.client.get(&path).await?;
        R::after_fetch(&mut item, Utc::now());
        Ok(item)
    }

    pub async fn create(&self, item: R::Item) -> Result<R::Item, ClientError> {
        let item = R::before_send(item)?;
        let mut created: R::Item = self
            .client
            .send_json(reqwest::Method::POST, R::PATH, &item)
            .await?;
        R::after_fetch(&mut created, Utc::now());
        Ok(created)
    }

    /// Replace the whole record; there is no partial update.
    pub async fn update(&self, id: &str, item: R::Item) -> Result<R::Item, ClientError> {
        let path = Self::item_path(id)?;
        let item = R::before_send(item)?;
        let mut updated: R::Item = self
            .client
            .send_json(reqwest::Method::PUT, &path, &item)
            .await?;
        R::after_fetch(&mut updated, Utc::now());
        Ok(updated)
    }

    pub async fn remove(&self, id: &str) -> Result<(), ClientError> {
        let path = Self::item_path(id)?;
        let _: IgnoredAny = self.client.delete(&path).await?;
        Ok(())
    }
}

impl ApiClient {
    pub fn resource<R: Resource>(&self) -> Endpoint<'_, R> {
        Endpoint::new(self)
    }
}

/// Every resource addressable by name from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    ProductDesignation,
    Facility,
    KickOff,
    MassProduction,
    Call,
    OkForLaunch,
    Supply,
    Validation,
    ValidationForOffer,
    QualificationConfirmation,
    User,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 11] = [
        ResourceKind::ProductDesignation,
        ResourceKind::Facility,
        ResourceKind::KickOff,
        ResourceKind::MassProduction,
        ResourceKind::Call,
        ResourceKind::OkForLaunch,
        ResourceKind::Supply,
        ResourceKind::Validation,
        ResourceKind::ValidationForOffer,
        ResourceKind::QualificationConfirmation,
        ResourceKind::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProductDesignation => "pd",
            Self::Facility => "facilities",
            Self::KickOff => "kickoff",
            Self::MassProduction => "massproduction",
            Self::Call => "call",
            Self::OkForLaunch => "okforlaunch",
            Self::Supply => "supply",
            Self::Validation => "validation",
            Self::ValidationForOffer => "validationforoffer",
            Self::QualificationConfirmation => "qualification_confirmation",
            Self::User => "users",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::ProductDesignation => ProductDesignations::PATH,
            Self::Facility => Facilities::PATH,
            Self::KickOff => KickOffs::PATH,
            Self::MassProduction => MassProductions::PATH,
            Self::Call => Calls::PATH,
            Self::OkForLaunch => OkForLaunch::PATH,
            Self::Supply => Supplies::PATH,
            Self::Validation => Validations::PATH,
            Self::ValidationForOffer => ValidationsForOffer::PATH,
            Self::QualificationConfirmation => QualificationConfirmations::PATH,
            Self::User => Users::PATH,
        }
    }

    /// Create and update go out as multipart forms.
    pub fn uses_form(&self) -> bool {
        matches!(self, Self::OkForLaunch | Self::ValidationForOffer)
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pd" | "product-designation" | "product_designation" => Ok(Self::ProductDesignation),
            "facilities" | "facility" => Ok(Self::Facility),
            "kickoff" | "kick-off" | "kick_off" => Ok(Self::KickOff),
            "massproduction" | "mass-production" | "mp" => Ok(Self::MassProduction),
            "call" | "calls" => Ok(Self::Call),
            "okforlaunch" | "okforlunch" | "ok-for-launch" => Ok(Self::OkForLaunch),
            "supply" | "supp" => Ok(Self::Supply),
            "validation" => Ok(Self::Validation),
            "validationforoffer" | "validation-for-offer" => Ok(Self::ValidationForOffer),
            "qualification_confirmation" | "qualification-confirmation" => {
                Ok(Self::QualificationConfirmation)
            }
            "users" | "user" => Ok(Self::User),
            _ => Err(format!(
                "Unknown resource '{}'. Valid values: {}",
                s,
                ResourceKind::ALL
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Option lists needed by the project form.
#[derive(Debug, Clone, Serialize)]
pub struct FormOptions {
    pub product_designations: Vec<Record>,
    pub users: Vec<User>,
}

/// Fetch product designations and users concurrently; fails if either fails.
pub async fn load_form_options(client: &ApiClient) -> Result<FormOptions, ClientError> {
    let pd = client.resource::<ProductDesignations>();
    let users = client.resource::<Users>();
    let (product_designations, users) = tokio::try_join!(pd.list(), users.list())?;
    Ok(FormOptions {
        product_designations,
        users,
    })
}
