use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::schema::{Field, FieldKind, Schema, WireModel};

// ---------------------------------------------------------------------------
// Warehouses
// ---------------------------------------------------------------------------

/// Stock of one sku at one S&S warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Warehouse {
    /// Code identifying the warehouse.
    pub warehouse_abbr: String,
    /// Unique ID for this sku (does not change).
    #[serde(rename = "skuID")]
    pub sku_id: i64,
    /// Quantity available for sale.
    pub qty: i64,
    /// Discontinued and will not be replenished.
    pub closeout: bool,
    /// Does not ship from an S&S warehouse.
    pub dropship: bool,
    pub exclude_free_freight: bool,
    /// Must be ordered in full case quantities.
    pub full_case_only: bool,
    pub returnable: bool,
    /// Enroute quantities with expected receipt dates, when the mill has any.
    #[serde(default)]
    pub expected_inventory: Option<String>,
}

pub(crate) static WAREHOUSE_SCHEMA: Schema = Schema {
    model: "Warehouse",
    fields: &[
        Field::required("warehouse_abbr", "warehouseAbbr", FieldKind::Str),
        Field::required("sku_id", "skuID", FieldKind::Int),
        Field::required("qty", "qty", FieldKind::Int),
        Field::required("closeout", "closeout", FieldKind::Bool),
        Field::required("dropship", "dropship", FieldKind::Bool),
        Field::required("exclude_free_freight", "excludeFreeFreight", FieldKind::Bool),
        Field::required("full_case_only", "fullCaseOnly", FieldKind::Bool),
        Field::required("returnable", "returnable", FieldKind::Bool),
        Field::nullable("expected_inventory", "expectedInventory", FieldKind::Str),
    ],
};

impl WireModel for Warehouse {
    fn schema() -> &'static Schema {
        &WAREHOUSE_SCHEMA
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// A sellable sku from the S&S catalog.
///
/// Image fields hold paths relative to `https://www.ssactivewear.com/`.
/// They point at the medium image; replace `_fm` with `_fl` (large) or
/// `_fs` (small) for other sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Product {
    /// Unique ID for this sku (does not change).
    #[serde(rename = "skuID_Master")]
    pub sku_id_master: i64,
    pub sku: String,
    /// Industry standard identifier used by all suppliers.
    pub gtin: String,
    /// Cross reference set up through the CrossRef API.
    pub your_sku: String,
    #[serde(rename = "baseCategoryID")]
    pub base_category_id: String,
    #[serde(rename = "brandID")]
    pub brand_id: String,
    pub brand_name: String,
    #[serde(rename = "styleID")]
    pub style_id: i64,
    /// Unique within a brand.
    pub style_name: String,
    pub color_name: String,
    /// Two digit color part of the inventory key.
    pub color_code: String,
    pub color_price_code_name: String,
    pub color_group: String,
    pub color_group_name: String,
    #[serde(rename = "colorFamilyID")]
    pub color_family_id: String,
    pub color_family: String,
    pub color_swatch_image: String,
    /// HTML color readable on top of the swatch.
    pub color_swatch_text_color: String,
    pub color_front_image: String,
    pub color_side_image: String,
    pub color_back_image: String,
    pub color_direct_side_image: String,
    pub color_on_model_front_image: String,
    pub color_on_model_side_image: String,
    pub color_on_model_back_image: String,
    /// HTML code of the primary color.
    pub color1: String,
    /// HTML code of the secondary color.
    pub color2: String,
    pub size_name: String,
    /// One digit size part of the inventory key.
    pub size_code: String,
    pub size_order: String,
    pub size_price_code_name: String,
    /// Units in a full case from the mill.
    pub case_qty: i64,
    pub unit_weight: f64,
    /// Minimum advertised price.
    pub map_price: f64,
    pub piece_price: f64,
    pub dozen_price: f64,
    pub case_price: f64,
    pub sale_price: f64,
    /// The account's own price.
    pub customer_price: f64,
    /// The mill prohibits selling on eRetailing platforms (Amazon, Walmart, eBay).
    #[serde(rename = "noeRetailing")]
    pub no_eretailing: bool,
    /// Pounds.
    pub case_weight: f64,
    /// Inches.
    pub case_width: f64,
    pub case_length: f64,
    pub case_height: f64,
    #[serde(rename = "polyPackQty")]
    pub poly_pack_quantity: i64,
    /// Combined inventory of every warehouse.
    #[serde(rename = "qty")]
    pub quantity: i64,
    pub country_of_origin: String,
    pub warehouses: Vec<Warehouse>,
    #[serde(default, with = "crate::schema::iso_datetime::option")]
    pub sale_expiration: Option<DateTime<FixedOffset>>,
}

pub(crate) static PRODUCT_SCHEMA: Schema = Schema {
    model: "Product",
    fields: &[
        Field::required("sku_id_master", "skuID_Master", FieldKind::Int),
        Field::required("sku", "sku", FieldKind::Str),
        Field::required("gtin", "gtin", FieldKind::Str),
        Field::required("your_sku", "yourSku", FieldKind::Str),
        Field::required("base_category_id", "baseCategoryID", FieldKind::Str),
        Field::required("brand_id", "brandID", FieldKind::Str),
        Field::required("brand_name", "brandName", FieldKind::Str),
        Field::required("style_id", "styleID", FieldKind::Int),
        Field::required("style_name", "styleName", FieldKind::Str),
        Field::required("color_name", "colorName", FieldKind::Str),
        Field::required("color_code", "colorCode", FieldKind::Str),
        Field::required("color_price_code_name", "colorPriceCodeName", FieldKind::Str),
        Field::required("color_group", "colorGroup", FieldKind::Str),
        Field::required("color_group_name", "colorGroupName", FieldKind::Str),
        Field::required("color_family_id", "colorFamilyID", FieldKind::Str),
        Field::required("color_family", "colorFamily", FieldKind::Str),
        Field::required("color_swatch_image", "colorSwatchImage", FieldKind::Str),
        Field::required("color_swatch_text_color", "colorSwatchTextColor", FieldKind::Str),
        Field::required("color_front_image", "colorFrontImage", FieldKind::Str),
        Field::required("color_side_image", "colorSideImage", FieldKind::Str),
        Field::required("color_back_image", "colorBackImage", FieldKind::Str),
        Field::required("color_direct_side_image", "colorDirectSideImage", FieldKind::Str),
        Field::required("color_on_model_front_image", "colorOnModelFrontImage", FieldKind::Str),
        Field::required("color_on_model_side_image", "colorOnModelSideImage", FieldKind::Str),
        Field::required("color_on_model_back_image", "colorOnModelBackImage", FieldKind::Str),
        Field::required("color1", "color1", FieldKind::Str),
        Field::required("color2", "color2", FieldKind::Str),
        Field::required("size_name", "sizeName", FieldKind::Str),
        Field::required("size_code", "sizeCode", FieldKind::Str),
        Field::required("size_order", "sizeOrder", FieldKind::Str),
        Field::required("size_price_code_name", "sizePriceCodeName", FieldKind::Str),
        Field::required("case_qty", "caseQty", FieldKind::Int),
        Field::required("unit_weight", "unitWeight", FieldKind::Float),
        Field::required("map_price", "mapPrice", FieldKind::Float),
        Field::required("piece_price", "piecePrice", FieldKind::Float),
        Field::required("dozen_price", "dozenPrice", FieldKind::Float),
        Field::required("case_price", "casePrice", FieldKind::Float),
        Field::required("sale_price", "salePrice", FieldKind::Float),
        Field::required("customer_price", "customerPrice", FieldKind::Float),
        Field::required("no_eretailing", "noeRetailing", FieldKind::Bool),
        Field::required("case_weight", "caseWeight", FieldKind::Float),
        Field::required("case_width", "caseWidth", FieldKind::Float),
        Field::required("case_length", "caseLength", FieldKind::Float),
        Field::required("case_height", "caseHeight", FieldKind::Float),
        Field::required("poly_pack_quantity", "polyPackQty", FieldKind::Int),
        Field::required("quantity", "qty", FieldKind::Int),
        Field::required("country_of_origin", "countryOfOrigin", FieldKind::Str),
        Field::required("warehouses", "warehouses", FieldKind::ObjectList(&WAREHOUSE_SCHEMA)),
        Field::nullable("sale_expiration", "saleExpiration", FieldKind::DateTime),
    ],
};

impl WireModel for Product {
    fn schema() -> &'static Schema {
        &PRODUCT_SCHEMA
    }
}

impl Product {
    /// Warehouse entry for the given abbreviation, if the sku is stocked there.
    pub fn warehouse(&self, abbr: &str) -> Option<&Warehouse> {
        self.warehouses.iter().find(|w| w.warehouse_abbr == abbr)
    }
}
