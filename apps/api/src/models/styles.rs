//! Visual style slots for the rendered resume template.
//!
//! Each slot holds a utility-class string consumed by the preview/export
//! collaborator. An absent slot falls back to the template default.

use serde::{Deserialize, Serialize};

/// Mapping from named visual slots to style-class strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_list: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_item: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills_list: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_item: Option<String>,
}

impl StyleOverrides {
    /// Shallow merge of a model-produced delta over the current mapping.
    /// Slots the delta sets win; slots it omits keep their current value,
    /// so no key present before the merge is ever dropped.
    pub fn merged_with(self, delta: StyleOverrides) -> StyleOverrides {
        StyleOverrides {
            container: delta.container.or(self.container),
            header: delta.header.or(self.header),
            name: delta.name.or(self.name),
            contact_info: delta.contact_info.or(self.contact_info),
            summary: delta.summary.or(self.summary),
            section: delta.section.or(self.section),
            section_title: delta.section_title.or(self.section_title),
            item_header: delta.item_header.or(self.item_header),
            item_title: delta.item_title.or(self.item_title),
            item_subtitle: delta.item_subtitle.or(self.item_subtitle),
            item_date: delta.item_date.or(self.item_date),
            item_list: delta.item_list.or(self.item_list),
            list_item: delta.list_item.or(self.list_item),
            skills_list: delta.skills_list.or(self.skills_list),
            skill_item: delta.skill_item.or(self.skill_item),
        }
    }
}

/// Built-in preview templates. Selecting one resets the overrides to its
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Classic,
    Modern,
    Professional,
}

impl Template {
    pub fn default_styles(self) -> StyleOverrides {
        match self {
            Template::Classic => StyleOverrides {
                container: Some("font-serif".to_string()),
                name: Some("text-4xl font-bold text-gray-800".to_string()),
                contact_info: Some("text-sm text-gray-600".to_string()),
                section_title: Some(
                    "text-xl font-bold text-gray-800 border-b-2 border-gray-800 pb-1 mb-3"
                        .to_string(),
                ),
                item_title: Some("text-lg font-semibold".to_string()),
                item_subtitle: Some("italic".to_string()),
                ..Default::default()
            },
            Template::Modern => StyleOverrides {
                container: Some("font-sans".to_string()),
                header: Some("bg-gray-800 text-white p-6 -mx-10 -mt-10 mb-6".to_string()),
                name: Some("text-5xl font-light text-white tracking-wider".to_string()),
                contact_info: Some("text-sm text-gray-300".to_string()),
                section_title: Some(
                    "text-lg font-semibold text-indigo-600 uppercase tracking-wider \
                     border-b-2 border-indigo-200 pb-1 mb-4"
                        .to_string(),
                ),
                item_title: Some("text-lg font-bold text-gray-900".to_string()),
                item_subtitle: Some("text-gray-600".to_string()),
                skill_item: Some("bg-indigo-100 text-indigo-800".to_string()),
                ..Default::default()
            },
            Template::Professional => StyleOverrides {
                container: Some("font-sans".to_string()),
                name: Some("text-3xl font-bold text-slate-900 uppercase tracking-wide".to_string()),
                contact_info: Some("text-sm text-slate-500".to_string()),
                section_title: Some(
                    "text-base font-bold text-slate-800 uppercase border-b border-slate-300 \
                     pb-1 mb-3"
                        .to_string(),
                ),
                item_title: Some("font-semibold text-slate-900".to_string()),
                item_subtitle: Some("text-sm text-slate-600".to_string()),
                item_date: Some("text-sm text-slate-500".to_string()),
                ..Default::default()
            },
        }
    }
}
