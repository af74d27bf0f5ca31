use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::schema::{parse_json, Field, FieldKind, Schema, ValidationError, WireModel};

// ---------------------------------------------------------------------------
// Shipping methods
// ---------------------------------------------------------------------------

/// Carrier service codes accepted by `POST /orders`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShippingMethod {
    /// Ground, carrier determined by S&S.
    #[default]
    #[serde(rename = "1")]
    Ground,
    #[serde(rename = "2")]
    UpsNextDayAir,
    #[serde(rename = "3")]
    UpsSecondDayAir,
    #[serde(rename = "6")]
    WillCall,
    #[serde(rename = "8")]
    MessengerPickup,
    #[serde(rename = "14")]
    FedexGround,
    #[serde(rename = "16")]
    UpsThreeDaySelect,
    #[serde(rename = "17")]
    UpsNextDayAirEarlyAm,
    #[serde(rename = "19")]
    UpsSaturday,
    #[serde(rename = "20")]
    UpsSaturdayEarly,
    #[serde(rename = "21")]
    UpsNextDayAirSaver,
    #[serde(rename = "22")]
    UpsSecondDayAirAm,
    #[serde(rename = "26")]
    FedexNextDayPriority,
    #[serde(rename = "27")]
    FedexNextDayStandard,
    #[serde(rename = "40")]
    UpsGround,
    #[serde(rename = "48")]
    FedexSecondDayAir,
    #[serde(rename = "54")]
    MiscCheapest,
}

impl ShippingMethod {
    pub const ALL: [ShippingMethod; 17] = [
        ShippingMethod::Ground,
        ShippingMethod::UpsNextDayAir,
        ShippingMethod::UpsSecondDayAir,
        ShippingMethod::WillCall,
        ShippingMethod::MessengerPickup,
        ShippingMethod::FedexGround,
        ShippingMethod::UpsThreeDaySelect,
        ShippingMethod::UpsNextDayAirEarlyAm,
        ShippingMethod::UpsSaturday,
        ShippingMethod::UpsSaturdayEarly,
        ShippingMethod::UpsNextDayAirSaver,
        ShippingMethod::UpsSecondDayAirAm,
        ShippingMethod::FedexNextDayPriority,
        ShippingMethod::FedexNextDayStandard,
        ShippingMethod::UpsGround,
        ShippingMethod::FedexSecondDayAir,
        ShippingMethod::MiscCheapest,
    ];

    /// Wire code, e.g. `"40"` for UPS Ground.
    pub const fn code(self) -> &'static str {
        match self {
            ShippingMethod::Ground => "1",
            ShippingMethod::UpsNextDayAir => "2",
            ShippingMethod::UpsSecondDayAir => "3",
            ShippingMethod::WillCall => "6",
            ShippingMethod::MessengerPickup => "8",
            ShippingMethod::FedexGround => "14",
            ShippingMethod::UpsThreeDaySelect => "16",
            ShippingMethod::UpsNextDayAirEarlyAm => "17",
            ShippingMethod::UpsSaturday => "19",
            ShippingMethod::UpsSaturdayEarly => "20",
            ShippingMethod::UpsNextDayAirSaver => "21",
            ShippingMethod::UpsSecondDayAirAm => "22",
            ShippingMethod::FedexNextDayPriority => "26",
            ShippingMethod::FedexNextDayStandard => "27",
            ShippingMethod::UpsGround => "40",
            ShippingMethod::FedexSecondDayAir => "48",
            ShippingMethod::MiscCheapest => "54",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            ShippingMethod::Ground => "Ground (carrier determined by S&S)",
            ShippingMethod::UpsNextDayAir => "UPS Next Day Air",
            ShippingMethod::UpsSecondDayAir => "UPS 2nd Day Air",
            ShippingMethod::WillCall => "Will Call / PickUp",
            ShippingMethod::MessengerPickup => "Messenger Pickup / PickUp",
            ShippingMethod::FedexGround => "FedEx Ground",
            ShippingMethod::UpsThreeDaySelect => "UPS 3 Day Select",
            ShippingMethod::UpsNextDayAirEarlyAm => "UPS Next Day Air Early AM",
            ShippingMethod::UpsSaturday => "UPS Saturday",
            ShippingMethod::UpsSaturdayEarly => "UPS Saturday Early",
            ShippingMethod::UpsNextDayAirSaver => "UPS Next Day Air Saver",
            ShippingMethod::UpsSecondDayAirAm => "UPS 2nd Day Air AM",
            ShippingMethod::FedexNextDayPriority => "FedEx Next Day Priority",
            ShippingMethod::FedexNextDayStandard => "FedEx Next Day Standard",
            ShippingMethod::UpsGround => "UPS Ground",
            ShippingMethod::FedexSecondDayAir => "FedEx 2nd Day Air",
            ShippingMethod::MiscCheapest => "Misc Cheapest",
        }
    }
}

/// Wire codes of [`ShippingMethod::ALL`], in the same order.
pub(crate) const SHIPPING_METHOD_CODES: &[&str] = &[
    "1", "2", "3", "6", "8", "14", "16", "17", "19", "20", "21", "22", "26", "27", "40", "48",
    "54",
];

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for ShippingMethod {
    type Err = ValidationError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        ShippingMethod::ALL
            .into_iter()
            .find(|m| m.code() == code)
            .ok_or_else(|| {
                ValidationError::single(
                    "ShippingMethod",
                    "shippingMethod",
                    format!("`{code}` is not a known shipping method code"),
                )
            })
    }
}

impl TryFrom<&str> for ShippingMethod {
    type Error = ValidationError;

    fn try_from(code: &str) -> Result<Self, Self::Error> {
        code.parse()
    }
}

/// How S&S picks warehouses when `autoselect_warehouse` is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoselectPreference {
    /// Fewest shipments, as long as transit stays within the max DIT.
    #[default]
    Fewest,
    Fastest,
}

const AUTOSELECT_PREFERENCES: &[&str] = &["fewest", "fastest"];

// ---------------------------------------------------------------------------
// Order request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShippingAddress {
    /// Customer or company name.
    pub customer: String,
    #[serde(rename = "attn")]
    pub attention_to: String,
    pub address: String,
    pub city: String,
    /// State abbreviation.
    pub state: String,
    #[serde(rename = "zip")]
    pub postal_code: String,
    /// Server default: residential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residential: Option<bool>,
}

impl ShippingAddress {
    pub fn new(
        customer: impl Into<String>,
        attention_to: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            customer: customer.into(),
            attention_to: attention_to.into(),
            address: address.into(),
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
            residential: None,
        }
    }

    pub fn is_residential(&self) -> bool {
        self.residential.unwrap_or(true)
    }
}

/// Pay with a card or bank account saved on the ssactivewear.com account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentProfile {
    /// Email of the website user the card is saved under.
    pub email: String,
    /// ID returned by `GET /v2/paymentprofile`.
    #[serde(rename = "profileID")]
    pub profile_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderLine {
    /// `skuID_Master`, sku or GTIN.
    pub identifier: String,
    #[serde(rename = "qty")]
    pub quantity: i64,
    /// Ship this line from a specific warehouse.
    #[serde(
        rename = "warehouseAbbr",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub warehouse_abbreviation: Option<String>,
}

impl OrderLine {
    pub fn new(identifier: impl Into<String>, quantity: i64) -> Self {
        Self {
            identifier: identifier.into(),
            quantity,
            warehouse_abbreviation: None,
        }
    }

    pub fn from_warehouse(mut self, abbr: impl Into<String>) -> Self {
        self.warehouse_abbreviation = Some(abbr.into());
        self
    }
}

/// Body of `POST /orders`.
///
/// Every optional field left at `None` is omitted from the JSON so the
/// server applies its own default; `effective_*` accessors report what that
/// default is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderRequest {
    pub shipping_address: ShippingAddress,
    pub lines: Vec<OrderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_method: Option<ShippingMethod>,
    /// Overrides the account's blind shipping setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_blind: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub po_number: Option<String>,
    /// Address receiving the order confirmation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_confirmation: Option<String>,
    /// Test orders are created and then cancelled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_order: Option<bool>,
    /// Let S&S choose warehouses; the order may be split.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoselect_warehouse: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion_code: Option<String>,
    /// Comma separated warehouse abbreviations autoselect is limited to,
    /// e.g. `IL,KS,GA`.
    #[serde(
        rename = "autoselectWarehouse_Warehouses",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub autoselect_warehouse_warehouses: Option<String>,
    #[serde(
        rename = "AutoSelectWarehouse_Preference",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub autoselect_warehouse_preference: Option<AutoselectPreference>,
    /// Max days in transit for `fewest` before S&S switches to `fastest`.
    #[serde(
        rename = "AutoSelectWarehouse_Fewest_MaxDIT",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub autoselect_warehouse_fewest_max_dit: Option<i64>,
    /// When false, fillable lines are placed and the rest come back as line
    /// errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject_line_errors: Option<bool>,
    /// Email unfillable lines to the confirmation address.
    #[serde(
        rename = "rejectLineErrors_Email",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reject_line_errors_email: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_profile: Option<PaymentProfile>,
}

impl OrderRequest {
    /// A request with only the required fields set.
    pub fn new(shipping_address: ShippingAddress, lines: Vec<OrderLine>) -> Self {
        Self {
            shipping_address,
            lines,
            shipping_method: None,
            ship_blind: None,
            po_number: None,
            email_confirmation: None,
            test_order: None,
            autoselect_warehouse: None,
            promotion_code: None,
            autoselect_warehouse_warehouses: None,
            autoselect_warehouse_preference: None,
            autoselect_warehouse_fewest_max_dit: None,
            reject_line_errors: None,
            reject_line_errors_email: None,
            payment_profile: None,
        }
    }

    pub fn effective_shipping_method(&self) -> ShippingMethod {
        self.shipping_method.unwrap_or_default()
    }

    pub fn effective_autoselect_preference(&self) -> AutoselectPreference {
        self.autoselect_warehouse_preference.unwrap_or_default()
    }

    pub fn effective_fewest_max_dit(&self) -> i64 {
        self.autoselect_warehouse_fewest_max_dit.unwrap_or(10)
    }

    pub fn effective_reject_line_errors(&self) -> bool {
        self.reject_line_errors.unwrap_or(true)
    }

    pub fn effective_reject_line_errors_email(&self) -> bool {
        self.reject_line_errors_email.unwrap_or(true)
    }
}

pub(crate) static SHIPPING_ADDRESS_SCHEMA: Schema = Schema {
    model: "ShippingAddress",
    fields: &[
        Field::required("customer", "customer", FieldKind::Str),
        Field::required("attention_to", "attn", FieldKind::Str),
        Field::required("address", "address", FieldKind::Str),
        Field::required("city", "city", FieldKind::Str),
        Field::required("state", "state", FieldKind::Str),
        Field::required("postal_code", "zip", FieldKind::Str),
        Field::defaulted("residential", "residential", FieldKind::Bool),
    ],
};

pub(crate) static PAYMENT_PROFILE_SCHEMA: Schema = Schema {
    model: "PaymentProfile",
    fields: &[
        Field::required("email", "email", FieldKind::Email),
        Field::required("profile_id", "profileID", FieldKind::Int),
    ],
};

pub(crate) static ORDER_LINE_SCHEMA: Schema = Schema {
    model: "OrderLine",
    fields: &[
        Field::required("identifier", "identifier", FieldKind::Str),
        Field::required("quantity", "qty", FieldKind::Int),
        Field::nullable("warehouse_abbreviation", "warehouseAbbr", FieldKind::Str),
    ],
};

pub(crate) static ORDER_REQUEST_SCHEMA: Schema = Schema {
    model: "OrderRequest",
    fields: &[
        Field::required(
            "shipping_address",
            "shippingAddress",
            FieldKind::Object(&SHIPPING_ADDRESS_SCHEMA),
        ),
        Field::required("lines", "lines", FieldKind::ObjectList(&ORDER_LINE_SCHEMA)),
        Field::defaulted(
            "shipping_method",
            "shippingMethod",
            FieldKind::OneOf(SHIPPING_METHOD_CODES),
        ),
        Field::nullable("ship_blind", "shipBlind", FieldKind::Bool),
        Field::defaulted("po_number", "poNumber", FieldKind::Str),
        Field::defaulted("email_confirmation", "emailConfirmation", FieldKind::Str),
        Field::defaulted("test_order", "testOrder", FieldKind::Bool),
        Field::defaulted("autoselect_warehouse", "autoselectWarehouse", FieldKind::Bool),
        Field::nullable("promotion_code", "promotionCode", FieldKind::Str),
        Field::nullable(
            "autoselect_warehouse_warehouses",
            "autoselectWarehouse_Warehouses",
            FieldKind::Str,
        ),
        Field::defaulted(
            "autoselect_warehouse_preference",
            "AutoSelectWarehouse_Preference",
            FieldKind::OneOf(AUTOSELECT_PREFERENCES),
        ),
        Field::defaulted(
            "autoselect_warehouse_fewest_max_dit",
            "AutoSelectWarehouse_Fewest_MaxDIT",
            FieldKind::Int,
        ),
        Field::defaulted("reject_line_errors", "rejectLineErrors", FieldKind::Bool),
        Field::defaulted(
            "reject_line_errors_email",
            "rejectLineErrors_Email",
            FieldKind::Bool,
        ),
        Field::nullable(
            "payment_profile",
            "paymentProfile",
            FieldKind::Object(&PAYMENT_PROFILE_SCHEMA),
        ),
    ],
};

impl WireModel for ShippingAddress {
    fn schema() -> &'static Schema {
        &SHIPPING_ADDRESS_SCHEMA
    }
}

impl WireModel for PaymentProfile {
    fn schema() -> &'static Schema {
        &PAYMENT_PROFILE_SCHEMA
    }
}

impl WireModel for OrderLine {
    fn schema() -> &'static Schema {
        &ORDER_LINE_SCHEMA
    }
}

impl WireModel for OrderRequest {
    fn schema() -> &'static Schema {
        &ORDER_REQUEST_SCHEMA
    }
}

// ---------------------------------------------------------------------------
// Order response
// ---------------------------------------------------------------------------

/// Ship-to address as echoed back by the API. Keys are the raw wire names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderResponseShippingAddress {
    pub customer: String,
    pub attn: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderResponseLine {
    pub line_number: i64,
    #[serde(rename = "type")]
    pub line_type: String,
    #[serde(rename = "skuID")]
    pub sku_id: i64,
    pub sku: String,
    pub gtin: String,
    pub your_sku: String,
    pub qty_ordered: i64,
    /// Per unit.
    pub price: f64,
    pub brand_name: String,
    pub style_name: String,
    pub title: String,
    pub color_name: String,
    pub size_name: String,
    pub returnable: bool,
}

/// One order created by S&S. A single request may produce several orders
/// when autoselect splits it across warehouses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderResponse {
    pub guid: Uuid,
    pub company_name: String,
    pub warehouse_abbr: String,
    pub order_number: String,
    pub invoice_number: String,
    pub po_number: String,
    pub customer_number: String,
    #[serde(with = "crate::schema::iso_datetime")]
    pub order_date: DateTime<FixedOffset>,
    #[serde(with = "crate::schema::iso_date")]
    pub expected_delivery_date: NaiveDate,
    /// e.g. `API`.
    pub order_type: String,
    pub terms: String,
    /// e.g. `In Progress`.
    pub order_status: String,
    pub dropship: bool,
    pub shipping_carrier: String,
    /// Human readable, e.g. `UPS Ground`; not a [`ShippingMethod`] code.
    pub shipping_method: String,
    pub ship_blind: bool,
    pub shipping_collect_number: String,
    pub shipping_address: OrderResponseShippingAddress,
    pub subtotal: f64,
    pub shipping: f64,
    /// Cash on delivery fee.
    pub cod: f64,
    pub tax: f64,
    pub small_order_fee: f64,
    pub cupon_discount: f64,
    pub sample_discount: f64,
    pub set_up_fee: f64,
    pub restock_fee: f64,
    pub debit_credit: f64,
    pub total: f64,
    pub total_pieces: i64,
    pub total_lines: i64,
    /// Pounds.
    pub total_weight: f64,
    pub total_boxes: i64,
    pub delivery_status: String,
    pub conveyor_lane: String,
    pub lines: Vec<OrderResponseLine>,
    pub shipping_saved: f64,
}

/// Result of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderResponseContainer {
    /// Lines that could not be filled. Always empty when line errors are
    /// rejected.
    pub line_errors: Vec<String>,
    pub orders: Vec<OrderResponse>,
}

pub(crate) static ORDER_RESPONSE_SHIPPING_ADDRESS_SCHEMA: Schema = Schema {
    model: "OrderResponseShippingAddress",
    fields: &[
        Field::required("customer", "customer", FieldKind::Str),
        Field::required("attn", "attn", FieldKind::Str),
        Field::required("address", "address", FieldKind::Str),
        Field::required("city", "city", FieldKind::Str),
        Field::required("state", "state", FieldKind::Str),
        Field::required("zip", "zip", FieldKind::Str),
    ],
};

pub(crate) static ORDER_RESPONSE_LINE_SCHEMA: Schema = Schema {
    model: "OrderResponseLine",
    fields: &[
        Field::required("line_number", "lineNumber", FieldKind::Int),
        Field::required("line_type", "type", FieldKind::Str),
        Field::required("sku_id", "skuID", FieldKind::Int),
        Field::required("sku", "sku", FieldKind::Str),
        Field::required("gtin", "gtin", FieldKind::Str),
        Field::required("your_sku", "yourSku", FieldKind::Str),
        Field::required("qty_ordered", "qtyOrdered", FieldKind::Int),
        Field::required("price", "price", FieldKind::Float),
        Field::required("brand_name", "brandName", FieldKind::Str),
        Field::required("style_name", "styleName", FieldKind::Str),
        Field::required("title", "title", FieldKind::Str),
        Field::required("color_name", "colorName", FieldKind::Str),
        Field::required("size_name", "sizeName", FieldKind::Str),
        Field::required("returnable", "returnable", FieldKind::Bool),
    ],
};

pub(crate) static ORDER_RESPONSE_SCHEMA: Schema = Schema {
    model: "OrderResponse",
    fields: &[
        Field::required("guid", "guid", FieldKind::Uuid),
        Field::required("company_name", "companyName", FieldKind::Str),
        Field::required("warehouse_abbr", "warehouseAbbr", FieldKind::Str),
        Field::required("order_number", "orderNumber", FieldKind::Str),
        Field::required("invoice_number", "invoiceNumber", FieldKind::Str),
        Field::required("po_number", "poNumber", FieldKind::Str),
        Field::required("customer_number", "customerNumber", FieldKind::Str),
        Field::required("order_date", "orderDate", FieldKind::DateTime),
        Field::required("expected_delivery_date", "expectedDeliveryDate", FieldKind::Date),
        Field::required("order_type", "orderType", FieldKind::Str),
        Field::required("terms", "terms", FieldKind::Str),
        Field::required("order_status", "orderStatus", FieldKind::Str),
        Field::required("dropship", "dropship", FieldKind::Bool),
        Field::required("shipping_carrier", "shippingCarrier", FieldKind::Str),
        Field::required("shipping_method", "shippingMethod", FieldKind::Str),
        Field::required("ship_blind", "shipBlind", FieldKind::Bool),
        Field::required("shipping_collect_number", "shippingCollectNumber", FieldKind::Str),
        Field::required(
            "shipping_address",
            "shippingAddress",
            FieldKind::Object(&ORDER_RESPONSE_SHIPPING_ADDRESS_SCHEMA),
        ),
        Field::required("subtotal", "subtotal", FieldKind::Float),
        Field::required("shipping", "shipping", FieldKind::Float),
        Field::required("cod", "cod", FieldKind::Float),
        Field::required("tax", "tax", FieldKind::Float),
        Field::required("small_order_fee", "smallOrderFee", FieldKind::Float),
        Field::required("cupon_discount", "cuponDiscount", FieldKind::Float),
        Field::required("sample_discount", "sampleDiscount", FieldKind::Float),
        Field::required("set_up_fee", "setUpFee", FieldKind::Float),
        Field::required("restock_fee", "restockFee", FieldKind::Float),
        Field::required("debit_credit", "debitCredit", FieldKind::Float),
        Field::required("total", "total", FieldKind::Float),
        Field::required("total_pieces", "totalPieces", FieldKind::Int),
        Field::required("total_lines", "totalLines", FieldKind::Int),
        Field::required("total_weight", "totalWeight", FieldKind::Float),
        Field::required("total_boxes", "totalBoxes", FieldKind::Int),
        Field::required("delivery_status", "deliveryStatus", FieldKind::Str),
        Field::required("conveyor_lane", "conveyorLane", FieldKind::Str),
        Field::required(
            "lines",
            "lines",
            FieldKind::ObjectList(&ORDER_RESPONSE_LINE_SCHEMA),
        ),
        Field::required("shipping_saved", "shippingSaved", FieldKind::Float),
    ],
};

pub(crate) static ORDER_RESPONSE_CONTAINER_SCHEMA: Schema = Schema {
    model: "OrderResponseContainer",
    fields: &[
        Field::required("line_errors", "lineErrors", FieldKind::StrList),
        Field::required(
            "orders",
            "orders",
            FieldKind::ObjectList(&ORDER_RESPONSE_SCHEMA),
        ),
    ],
};

impl WireModel for OrderResponseShippingAddress {
    fn schema() -> &'static Schema {
        &ORDER_RESPONSE_SHIPPING_ADDRESS_SCHEMA
    }
}

impl WireModel for OrderResponseLine {
    fn schema() -> &'static Schema {
        &ORDER_RESPONSE_LINE_SCHEMA
    }
}

impl WireModel for OrderResponse {
    fn schema() -> &'static Schema {
        &ORDER_RESPONSE_SCHEMA
    }
}

impl WireModel for OrderResponseContainer {
    fn schema() -> &'static Schema {
        &ORDER_RESPONSE_CONTAINER_SCHEMA
    }
}

// ---------------------------------------------------------------------------
// Response shape
// ---------------------------------------------------------------------------

/// Body layout of a successful `POST /orders`.
///
/// With `rejectLineErrors` on (the default) the API answers with a bare array
/// of orders; with it off it answers `{lineErrors, orders}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderResponseShape {
    BareOrders,
    Container,
}

impl OrderResponseShape {
    pub fn for_request(request: &OrderRequest) -> Self {
        if request.effective_reject_line_errors() {
            OrderResponseShape::BareOrders
        } else {
            OrderResponseShape::Container
        }
    }

    /// Decode a response body into the container, wrapping bare arrays with
    /// an empty `lineErrors`.
    pub fn decode(self, body: &str) -> Result<OrderResponseContainer, ValidationError> {
        let value = parse_json(ORDER_RESPONSE_CONTAINER_SCHEMA.model, body)?;
        let value = match self {
            OrderResponseShape::BareOrders => {
                debug!("wrapping bare order list into container");
                json!({ "lineErrors": [], "orders": value })
            }
            OrderResponseShape::Container => value,
        };
        OrderResponseContainer::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const ORDER_FIXTURE: &str = include_str!("../../tests/fixtures/order_response.json");

    fn address() -> ShippingAddress {
        ShippingAddress::new(
            "Acme Screen Printing",
            "Jane Doe",
            "123 Main St",
            "Springfield",
            "IL",
            "62701",
        )
    }

    fn minimal_request() -> OrderRequest {
        OrderRequest::new(address(), vec![OrderLine::new("B00760004", 10)])
    }

    #[test]
    fn shipping_method_codes_match_serde() {
        assert_eq!(ShippingMethod::ALL.len(), SHIPPING_METHOD_CODES.len());
        for (method, code) in ShippingMethod::ALL.iter().zip(SHIPPING_METHOD_CODES) {
            assert_eq!(method.code(), *code);
            assert_eq!(serde_json::to_value(method).unwrap(), Value::from(*code));
            assert_eq!(code.parse::<ShippingMethod>().unwrap(), *method);
        }
    }

    #[test]
    fn unknown_shipping_method_is_rejected() {
        let err = ShippingMethod::try_from("99").unwrap_err();
        assert_eq!(err.issues[0].path, "shippingMethod");

        let mut payload = minimal_request().to_value().unwrap();
        payload["shippingMethod"] = Value::from("99");
        let err = OrderRequest::from_value(payload).unwrap_err();
        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["shippingMethod"]);

        let mut payload = minimal_request().to_value().unwrap();
        payload["shippingMethod"] = Value::from(40);
        assert!(OrderRequest::from_value(payload).is_err());
    }

    #[test]
    fn unknown_autoselect_preference_is_rejected() {
        let mut payload = minimal_request().to_value().unwrap();
        payload["AutoSelectWarehouse_Preference"] = Value::from("cheapest");
        let err = OrderRequest::from_value(payload).unwrap_err();
        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["AutoSelectWarehouse_Preference"]);
    }

    #[test]
    fn minimal_request_omits_unset_fields() {
        let payload = minimal_request().to_value().unwrap();
        assert_eq!(
            payload,
            json!({
                "shippingAddress": {
                    "customer": "Acme Screen Printing",
                    "attn": "Jane Doe",
                    "address": "123 Main St",
                    "city": "Springfield",
                    "state": "IL",
                    "zip": "62701"
                },
                "lines": [{"identifier": "B00760004", "qty": 10}]
            })
        );
    }

    #[test]
    fn minimal_request_round_trips() {
        let request = minimal_request();
        let json = serde_json::to_string(&request.to_value().unwrap()).unwrap();
        let decoded = OrderRequest::from_json(&json).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn full_request_uses_wire_names() {
        let request = OrderRequest {
            shipping_method: Some(ShippingMethod::UpsGround),
            ship_blind: Some(true),
            po_number: Some("PO-1001".into()),
            test_order: Some(true),
            autoselect_warehouse: Some(true),
            autoselect_warehouse_warehouses: Some("IL,KS".into()),
            autoselect_warehouse_preference: Some(AutoselectPreference::Fastest),
            autoselect_warehouse_fewest_max_dit: Some(3),
            reject_line_errors: Some(false),
            reject_line_errors_email: Some(false),
            payment_profile: Some(PaymentProfile {
                email: "buyer@example.com".into(),
                profile_id: 77,
            }),
            ..OrderRequest::new(
                ShippingAddress {
                    residential: Some(false),
                    ..address()
                },
                vec![OrderLine::new("B00760004", 10).from_warehouse("KS")],
            )
        };

        let payload = request.to_value().unwrap();
        assert_eq!(payload["shippingMethod"], "40");
        assert_eq!(payload["shipBlind"], true);
        assert_eq!(payload["autoselectWarehouse_Warehouses"], "IL,KS");
        assert_eq!(payload["AutoSelectWarehouse_Preference"], "fastest");
        assert_eq!(payload["AutoSelectWarehouse_Fewest_MaxDIT"], 3);
        assert_eq!(payload["rejectLineErrors"], false);
        assert_eq!(payload["rejectLineErrors_Email"], false);
        assert_eq!(payload["paymentProfile"]["profileID"], 77);
        assert_eq!(payload["shippingAddress"]["residential"], false);
        assert_eq!(payload["lines"][0]["warehouseAbbr"], "KS");
        assert!(payload.get("promotionCode").is_none());
        assert!(payload.get("emailConfirmation").is_none());

        assert!(request.validate().is_ok());
        assert_eq!(OrderRequest::from_value(payload).unwrap(), request);
    }

    #[test]
    fn effective_defaults() {
        let request = minimal_request();
        assert_eq!(request.effective_shipping_method(), ShippingMethod::Ground);
        assert_eq!(request.effective_autoselect_preference(), AutoselectPreference::Fewest);
        assert_eq!(request.effective_fewest_max_dit(), 10);
        assert!(request.effective_reject_line_errors());
        assert!(request.effective_reject_line_errors_email());
        assert!(request.shipping_address.is_residential());
    }

    #[test]
    fn invalid_payment_email_fails_validation() {
        let request = OrderRequest {
            payment_profile: Some(PaymentProfile {
                email: "not-an-email".into(),
                profile_id: 1,
            }),
            ..minimal_request()
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["paymentProfile.email"]);
    }

    #[test]
    fn request_rejects_null_for_defaulted_fields() {
        let mut payload = minimal_request().to_value().unwrap();
        payload["poNumber"] = Value::Null;
        payload["shipBlind"] = Value::Null;
        payload["lines"][0]["qty"] = Value::from("10");
        let err = OrderRequest::from_value(payload).unwrap_err();
        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["lines.0.qty", "poNumber"]);
    }

    #[test]
    fn decodes_order_fixture() {
        let order = OrderResponse::from_json(ORDER_FIXTURE).unwrap();
        assert_eq!(order.guid.to_string(), "9c4e0f42-7b8e-4b5f-9a43-7c2f8a1d5e60");
        assert_eq!(order.expected_delivery_date, NaiveDate::from_ymd_opt(2024, 4, 5).unwrap());
        assert_eq!(order.order_date.to_rfc3339(), "2024-04-02T10:15:30.250+00:00");
        assert_eq!(order.shipping_address.zip, "62701");
        assert_eq!(order.lines[0].line_type, "Product");
        assert_eq!(order.lines[0].qty_ordered, 10);
        assert_eq!(order.total, 41.9);
    }

    #[test]
    fn order_schema_matches_wire_keys() {
        let fixture: Value = serde_json::from_str(ORDER_FIXTURE).unwrap();
        let keys = fixture.as_object().unwrap();
        assert_eq!(keys.len(), ORDER_RESPONSE_SCHEMA.fields.len());
        for field in ORDER_RESPONSE_SCHEMA.fields {
            assert!(keys.contains_key(field.wire), "fixture lacks {}", field.wire);
        }

        let order = OrderResponse::from_value(fixture).unwrap();
        assert!(order.validate().is_ok());
    }

    #[test]
    fn order_guid_must_be_a_uuid() {
        let mut fixture: Value = serde_json::from_str(ORDER_FIXTURE).unwrap();
        fixture["guid"] = Value::from("order-1");
        fixture["expectedDeliveryDate"] = Value::from("2024-04-05T09:00:00");
        let err = OrderResponse::from_value(fixture).unwrap_err();
        assert_eq!(
            err.paths().collect::<Vec<_>>(),
            vec!["guid", "expectedDeliveryDate"]
        );
    }

    #[test]
    fn bare_shape_wraps_orders() {
        let body = format!("[{ORDER_FIXTURE}]");
        let container = OrderResponseShape::BareOrders.decode(&body).unwrap();
        assert!(container.line_errors.is_empty());
        assert_eq!(container.orders.len(), 1);
    }

    #[test]
    fn container_shape_is_taken_as_is() {
        let body = format!(r#"{{"lineErrors": ["Line 2: out of stock"], "orders": [{ORDER_FIXTURE}]}}"#);
        let container = OrderResponseShape::Container.decode(&body).unwrap();
        assert_eq!(container.line_errors, vec!["Line 2: out of stock".to_string()]);
        assert_eq!(container.orders.len(), 1);
    }

    #[test]
    fn shape_mismatch_is_a_validation_error() {
        let body = format!(r#"{{"lineErrors": [], "orders": [{ORDER_FIXTURE}]}}"#);
        let err = OrderResponseShape::BareOrders.decode(&body).unwrap_err();
        assert_eq!(err.model, "OrderResponseContainer");
        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["orders"]);

        let body = format!("[{ORDER_FIXTURE}]");
        assert!(OrderResponseShape::Container.decode(&body).is_err());
    }

    #[test]
    fn shape_follows_reject_line_errors() {
        let request = minimal_request();
        assert_eq!(OrderResponseShape::for_request(&request), OrderResponseShape::BareOrders);

        let request = OrderRequest {
            reject_line_errors: Some(false),
            ..request
        };
        assert_eq!(OrderResponseShape::for_request(&request), OrderResponseShape::Container);
    }
}
