use serde::Serialize;

use super::{non_empty, value_diff, Differ, ExtensionsDiff, ValueDiff};
use crate::openapi::{Contact, ExternalDocs, Info, License};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InfoDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_diff: Option<ValueDiff<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_of_service_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_diff: Option<ValueDiff<Option<Contact>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_diff: Option<ValueDiff<Option<License>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_diff: Option<ValueDiff<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions_diff: Option<ExtensionsDiff>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExternalDocsDiff {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub docs_added: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub docs_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_diff: Option<ValueDiff<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_diff: Option<ValueDiff<String>>,
}

super::empty_when_default!(InfoDiff, ExternalDocsDiff);

impl<'a> Differ<'a> {
    pub(crate) fn info(&self, base: &Info, revision: &Info) -> Option<InfoDiff> {
        non_empty(InfoDiff {
            title_diff: value_diff(&base.title, &revision.title),
            description_diff: self.description(&base.description, &revision.description),
            terms_of_service_diff: value_diff(&base.terms_of_service, &revision.terms_of_service),
            contact_diff: value_diff(&base.contact, &revision.contact),
            license_diff: value_diff(&base.license, &revision.license),
            version_diff: value_diff(&base.version, &revision.version),
            extensions_diff: self.extensions(&base.extensions, &revision.extensions),
        })
    }

    pub(crate) fn external_docs(
        &self,
        base: Option<&ExternalDocs>,
        revision: Option<&ExternalDocs>,
    ) -> Option<ExternalDocsDiff> {
        match (base, revision) {
            (None, None) => None,
            (None, Some(_)) => Some(ExternalDocsDiff {
                docs_added: true,
                ..Default::default()
            }),
            (Some(_), None) => Some(ExternalDocsDiff {
                docs_deleted: true,
                ..Default::default()
            }),
            (Some(base), Some(revision)) => non_empty(ExternalDocsDiff {
                description_diff: self.description(&base.description, &revision.description),
                url_diff: value_diff(&base.url, &revision.url),
                ..Default::default()
            }),
        }
    }
}
