//! Inline field tables for the Bitly streams

use super::types::{Field, FieldType};

const STRING: FieldType = FieldType::String;
const DATETIME: FieldType = FieldType::DateTime;
const INTEGER: FieldType = FieldType::Integer;
const BOOLEAN: FieldType = FieldType::Boolean;
const STRING_LIST: FieldType = FieldType::Array(&FieldType::String);
const ANY_OBJECT: FieldType = FieldType::Object(&[]);

pub const GROUPS: &[Field] = &[
    Field::new("guid", STRING).describe("The group's unique identifier."),
    Field::new("name", STRING).describe("The group's name."),
    Field::new(
        "references",
        FieldType::Object(&[Field::new("organization", STRING)]),
    )
    .describe("Mapping of group references."),
    Field::new("created", DATETIME).describe("The date and time the group was created."),
    Field::new("modified", DATETIME).describe("The date and time the group was last modified."),
    Field::new("bsds", STRING_LIST).describe("The group's branded short domains."),
    Field::new("organization_guid", STRING)
        .describe("The group's organization's unique identifier."),
    Field::new("is_active", BOOLEAN).describe("Whether the group is active."),
    Field::new("role", STRING).describe("The group's role."),
];

pub const BITLINKS: &[Field] = &[
    Field::new("id", STRING).describe("The bitlink's unique identifier."),
    Field::new("created_at", DATETIME).describe("The date and time the bitlink was created."),
    Field::new("link", STRING).describe("The bitlink's URL."),
    Field::new("custom_bitlinks", STRING_LIST).describe("The bitlink's custom bitlinks."),
    Field::new("long_url", STRING).describe("The bitlink's long URL."),
    Field::new("title", STRING).describe("The bitlink's title."),
    Field::new("archived", BOOLEAN).describe("Whether the bitlink is archived."),
    Field::new("created_by", STRING).describe("The bitlink's creator."),
    Field::new("client_id", STRING).describe("The bitlink's client ID."),
    Field::new("tags", STRING_LIST).describe("The bitlink's tags."),
    Field::new("deeplinks", STRING_LIST).describe("The bitlink's deeplinks."),
    Field::new("references", FieldType::Object(&[Field::new("group", STRING)]))
        .describe("Mapping of bitlink references."),
    Field::new("group_guid", STRING).describe("The bitlink's group."),
];

pub const BSDS: &[Field] = &[Field::new("domain", STRING)
    .required()
    .describe("The branded short domain.")];

pub const CAMPAIGNS: &[Field] = &[
    Field::new("guid", STRING)
        .required()
        .describe("The campaign's unique identifier."),
    Field::new("group_guid", STRING).describe("The campaign's group."),
    Field::new("name", STRING).describe("The campaign's name."),
    Field::new("description", STRING).describe("The campaign's description."),
    Field::new("created", DATETIME).describe("The date and time the campaign was created."),
    Field::new("modified", DATETIME)
        .describe("The date and time the campaign was last modified."),
    Field::new("created_by", STRING).describe("The campaign's creator."),
    Field::new("references", ANY_OBJECT).describe("Mapping of campaign references."),
];

pub const CHANNELS: &[Field] = &[
    Field::new("guid", STRING).describe("The channel's unique identifier."),
    Field::new("name", STRING).describe("The channel's name."),
    Field::new("created", DATETIME).describe("The date and time the channel was created."),
    Field::new("modified", DATETIME).describe("The date and time the channel was last modified."),
    Field::new("group_guid", STRING).describe("The channel's group."),
    Field::new("references", ANY_OBJECT).describe("Mapping of channel references."),
];

pub const ORGANIZATIONS: &[Field] = &[
    Field::new("guid", STRING).describe("The organization's unique identifier."),
    Field::new(
        "references",
        FieldType::Object(&[Field::new("groups", STRING).describe("The organization's groups.")]),
    )
    .describe("Mapping of organization references."),
    Field::new("name", STRING).describe("The organization's name."),
    Field::new("is_active", BOOLEAN).describe("Whether the organization is active."),
    Field::new("tier", STRING).describe("The organization's tier."),
    Field::new("tier_family", STRING).describe("The organization's tier family."),
    Field::new("tier_display_name", STRING).describe("The organization's tier display name."),
    Field::new("role", STRING).describe("The organization's role."),
    Field::new("created", DATETIME).describe("The date and time the organization was created."),
    Field::new("modified", DATETIME)
        .describe("The date and time the organization was last modified."),
    Field::new("bsds", STRING_LIST).describe("The organization's branded short domains."),
];

pub const WEBHOOKS: &[Field] = &[
    Field::new("guid", STRING).describe("The webhook's unique identifier."),
    Field::new("name", STRING).describe("The webhook's name."),
    Field::new("references", ANY_OBJECT).describe("Mapping of webhook references."),
    Field::new("created", DATETIME).describe("The date and time the webhook was created."),
    Field::new("modified", DATETIME).describe("The date and time the webhook was last modified."),
    Field::new("modified_by", STRING).describe("The webhook's modifier."),
    Field::new("deactivated", DATETIME)
        .describe("The date and time the webhook was deactivated."),
    Field::new("is_active", BOOLEAN).describe("Whether the webhook is active."),
    Field::new("organization_guid", STRING).describe("The webhook's organization."),
    Field::new("group_guid", STRING).describe("The webhook's group."),
    Field::new("event", STRING).describe("The webhook's event."),
    Field::new("url", STRING).describe("The webhook's URL."),
    Field::new("status", STRING).describe("The webhook's status."),
    Field::new("oauth_url", STRING).describe("The webhook's OAuth URL."),
    Field::new("client_id", STRING).describe("The webhook's client ID."),
    Field::new("client_secret", STRING).describe("The webhook's client secret."),
    Field::new("fetch_tags", BOOLEAN).describe("Whether to fetch tags."),
];

/// Shared by the daily and monthly click streams
pub const BITLINK_CLICKS: &[Field] = &[
    Field::new("clicks", INTEGER).describe("The number of clicks."),
    Field::new("date", DATETIME).describe("The date."),
    Field::new("bitlink", STRING).describe("The bitlink."),
];
