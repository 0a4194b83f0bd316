/// A registered customer. Created at signup by an external system; the order
/// core only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub delivery_address: String,
    pub default_location: Option<String>,
}

/// Payload for registering a customer.
#[derive(Debug, Clone)]
pub struct CustomerCreate {
    pub name: String,
    pub delivery_address: String,
    pub default_location: Option<String>,
}

/// Payload for updating a customer's delivery details.
#[derive(Debug, Clone)]
pub struct CustomerPatch {
    pub delivery_address: Option<String>,
    pub default_location: Option<String>,
}
