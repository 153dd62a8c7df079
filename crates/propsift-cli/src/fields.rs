//! Destination field catalogue.
//!
//! The columns of the `properties` table a CSV column can map onto, grouped
//! the way the schema lays them out. System-managed columns (`id`,
//! `import_batch_id`, `source`) are excluded; the importer fills those.

/// Every mappable destination field, in display order.
pub const DESTINATION_FIELDS: &[&str] = &[
    // Ownership and contact
    "first_name",
    "last_name",
    "business_name",
    "status",
    "phone_1",
    "phone_2",
    "phone_3",
    "phone_4",
    "phone_5",
    "phone_type_1",
    "phone_type_2",
    "phone_type_3",
    "phone_type_4",
    "phone_type_5",
    "phone_status_1",
    "phone_status_2",
    "phone_status_3",
    "phone_status_4",
    "phone_status_5",
    "phone_tags_1",
    "phone_tags_2",
    "phone_tags_3",
    "phone_tags_4",
    "phone_tags_5",
    "email_1",
    "email_2",
    "email_3",
    "email_4",
    "email_5",
    "email_6",
    "email_7",
    "email_8",
    "email_9",
    "email_10",
    // Property location
    "property_address",
    "property_city",
    "property_state",
    "property_zip",
    "property_zip5",
    "property_county",
    "property_vacant",
    // Mailing address
    "mailing_address",
    "mailing_city",
    "mailing_state",
    "mailing_zip",
    "mailing_zip5",
    "mailing_county",
    "mailing_vacant",
    // Classification
    "tags",
    "lists",
    "list_stack",
    // Building characteristics
    "bedrooms",
    "bathrooms",
    "sqft",
    "year",
    "above_grade",
    "storeys",
    "number_of_units",
    "structure_type",
    "heating_type",
    "air_conditioner",
    "building_use_code",
    "neighborhood_rating",
    // Lot and identifiers
    "apn",
    "parcel_id",
    "lot_size",
    "land_zoning",
    "legal_description",
    "deed",
    "mls",
    // Valuation and sale history
    "estimated_value",
    "rental_value",
    "last_sale_price",
    "last_sold",
    "owned_since",
    // Financing
    "mortgage_type",
    "open_mortgages",
    "loan_to_value",
    // Taxes
    "total_taxes",
    "tax_delinquent_value",
    "tax_delinquent_year",
    "year_behind_on_taxes",
    "tax_auction_date",
    // Distress indicators
    "foreclosure_date",
    "bankruptcy_recording_date",
    "divorce_file_date",
    "probate_open_date",
    "personal_representative",
    "personal_representative_phone",
    "attorney_on_file",
    "lien_type",
    "lien_recording_date",
];
