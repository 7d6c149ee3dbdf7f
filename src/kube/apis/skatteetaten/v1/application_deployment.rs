use std::{
    borrow::Cow,
    hash::{Hash, Hasher},
};

use k8s_openapi::{
    apimachinery::pkg::apis::meta::v1::ObjectMeta, DeepMerge, NamespaceResourceScope,
};
use once_cell::sync::Lazy;
use serde::{de, ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer};

use crate::kube::resource::HasMetadata;

use super::{ApplicationDeploymentSpec, API_VERSION, GROUP, VERSION};

pub const KIND: &str = "ApplicationDeployment";

pub const PLURAL: &str = "applicationdeployments";

static EMPTY_METADATA: Lazy<ObjectMeta> = Lazy::new(ObjectMeta::default);

/// ApplicationDeployment is the Aurora custom resource describing one deployed application
/// instance. `apiVersion` and `kind` are always present, `metadata` and `spec` may be absent.
///
/// Serializes as `apiVersion`, `kind`, `metadata`, `spec` in that order, omitting absent
/// fields. A `status` key is accepted on input and dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct ApplicationDeployment {
    api_version: String,
    kind: String,
    metadata: Option<ObjectMeta>,
    spec: Option<ApplicationDeploymentSpec>,
}

impl Default for ApplicationDeployment {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: None,
            spec: None,
        }
    }
}

impl ApplicationDeployment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spec(spec: ApplicationDeploymentSpec) -> Self {
        Self {
            spec: Some(spec),
            ..Default::default()
        }
    }

    /// A record carrying only name and namespace, used to address get and delete calls.
    pub fn stub(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            metadata: Some(ObjectMeta {
                name: Some(name.into()),
                namespace: Some(namespace.into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn set_api_version(&mut self, api_version: impl Into<String>) {
        self.api_version = api_version.into();
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn set_kind(&mut self, kind: impl Into<String>) {
        self.kind = kind.into();
    }

    pub fn metadata(&self) -> Option<&ObjectMeta> {
        self.metadata.as_ref()
    }

    pub fn set_metadata(&mut self, metadata: Option<ObjectMeta>) {
        self.metadata = metadata;
    }

    pub fn spec(&self) -> Option<&ApplicationDeploymentSpec> {
        self.spec.as_ref()
    }

    pub fn spec_mut(&mut self) -> Option<&mut ApplicationDeploymentSpec> {
        self.spec.as_mut()
    }

    pub fn set_spec(&mut self, spec: Option<ApplicationDeploymentSpec>) {
        self.spec = spec;
    }
}

// ObjectMeta holds no floating point values, so its PartialEq is total.
impl Eq for ApplicationDeployment {}

impl Hash for ApplicationDeployment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.api_version.hash(state);
        self.kind.hash(state);
        self.metadata.as_ref().map(MetadataIdentity::from).hash(state);
        self.spec.hash(state);
    }
}

/// The hashable subset of ObjectMeta. Hashing fewer fields than `eq` compares keeps
/// equal records hashing equally.
#[derive(Hash)]
struct MetadataIdentity<'a> {
    name: Option<&'a str>,
    namespace: Option<&'a str>,
    uid: Option<&'a str>,
    resource_version: Option<&'a str>,
    labels: Option<&'a std::collections::BTreeMap<String, String>>,
    annotations: Option<&'a std::collections::BTreeMap<String, String>>,
}

impl<'a> From<&'a ObjectMeta> for MetadataIdentity<'a> {
    fn from(meta: &'a ObjectMeta) -> Self {
        Self {
            name: meta.name.as_deref(),
            namespace: meta.namespace.as_deref(),
            uid: meta.uid.as_deref(),
            resource_version: meta.resource_version.as_deref(),
            labels: meta.labels.as_ref(),
            annotations: meta.annotations.as_ref(),
        }
    }
}

impl HasMetadata for ApplicationDeployment {
    fn api_version(&self) -> &str {
        &self.api_version
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn metadata(&self) -> Option<&ObjectMeta> {
        self.metadata.as_ref()
    }

    fn set_metadata(&mut self, metadata: Option<ObjectMeta>) {
        self.metadata = metadata;
    }

    fn set_api_version(&mut self, api_version: String) {
        self.api_version = api_version;
    }
}

impl kube::Resource for ApplicationDeployment {
    type DynamicType = ();
    type Scope = NamespaceResourceScope;

    fn kind(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(KIND)
    }

    fn group(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(GROUP)
    }

    fn version(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(VERSION)
    }

    fn api_version(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(API_VERSION)
    }

    fn plural(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(PLURAL)
    }

    fn meta(&self) -> &ObjectMeta {
        self.metadata.as_ref().unwrap_or(&*EMPTY_METADATA)
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        self.metadata.get_or_insert_with(ObjectMeta::default)
    }
}

impl DeepMerge for ApplicationDeployment {
    fn merge_from(&mut self, other: Self) {
        DeepMerge::merge_from(&mut self.api_version, other.api_version);
        DeepMerge::merge_from(&mut self.kind, other.kind);
        DeepMerge::merge_from(&mut self.metadata, other.metadata);
        DeepMerge::merge_from(&mut self.spec, other.spec);
    }
}

impl<'de> Deserialize<'de> for ApplicationDeployment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[allow(non_camel_case_types)]
        enum Field {
            Key_api_version,
            Key_kind,
            Key_metadata,
            Key_spec,
            Key_status,
            Other,
        }

        impl<'de> Deserialize<'de> for Field {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                struct Visitor;

                impl de::Visitor<'_> for Visitor {
                    type Value = Field;

                    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                        f.write_str("field identifier")
                    }

                    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
                    where
                        E: de::Error,
                    {
                        Ok(match v {
                            "apiVersion" => Field::Key_api_version,
                            "kind" => Field::Key_kind,
                            "metadata" => Field::Key_metadata,
                            "spec" => Field::Key_spec,
                            "status" => Field::Key_status,
                            _ => Field::Other,
                        })
                    }
                }

                deserializer.deserialize_identifier(Visitor)
            }
        }

        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = ApplicationDeployment;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(KIND)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut value = ApplicationDeployment::default();

                while let Some(key) = map.next_key::<Field>()? {
                    match key {
                        Field::Key_api_version => {
                            if let Some(api_version) = map.next_value::<Option<String>>()? {
                                value.api_version = api_version;
                            }
                        }
                        Field::Key_kind => {
                            if let Some(kind) = map.next_value::<Option<String>>()? {
                                value.kind = kind;
                            }
                        }
                        Field::Key_metadata => value.metadata = map.next_value()?,
                        Field::Key_spec => value.spec = map.next_value()?,
                        Field::Key_status | Field::Other => {
                            let _: de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                Ok(value)
            }
        }

        deserializer.deserialize_struct(
            KIND,
            &["apiVersion", "kind", "metadata", "spec", "status"],
            Visitor,
        )
    }
}

impl Serialize for ApplicationDeployment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct(
            KIND,
            2 + self.metadata.as_ref().map_or(0, |_| 1) + self.spec.as_ref().map_or(0, |_| 1),
        )?;
        state.serialize_field("apiVersion", &self.api_version)?;
        state.serialize_field("kind", &self.kind)?;
        if let Some(value) = &self.metadata {
            state.serialize_field("metadata", value)?;
        }
        if let Some(value) = &self.spec {
            state.serialize_field("spec", value)?;
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{hash_map::DefaultHasher, BTreeMap, HashSet};

    use indoc::indoc;
    use kube::{Resource, ResourceExt};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::kube::apis::skatteetaten::v1::{
        ApplicationDeploymentCommand, ApplicationDeploymentRef, AuroraConfigRef,
    };

    fn metadata(name: &str, namespace: &str) -> ObjectMeta {
        ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(BTreeMap::from([("app".to_string(), name.to_string())])),
            ..Default::default()
        }
    }

    fn spec() -> ApplicationDeploymentSpec {
        ApplicationDeploymentSpec {
            application_id: "abc".to_string(),
            application_name: Some("foo".to_string()),
            application_deployment_id: Some("def".to_string()),
            selector: BTreeMap::from([("name".to_string(), "foo".to_string())]),
            command: Some(ApplicationDeploymentCommand {
                override_files: BTreeMap::new(),
                application_deployment_ref: ApplicationDeploymentRef {
                    environment: "utv".to_string(),
                    application: "foo".to_string(),
                },
                aurora_config: AuroraConfigRef {
                    name: "paas".to_string(),
                    ref_name: "master".to_string(),
                    resolved_ref: None,
                },
            }),
            ..Default::default()
        }
    }

    fn record() -> ApplicationDeployment {
        let mut record = ApplicationDeployment::with_spec(spec());
        record.set_metadata(Some(metadata("foo", "bar")));
        record
    }

    fn hash_of(value: &ApplicationDeployment) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn default_construction() {
        let actual = ApplicationDeployment::new();

        assert_eq!(actual.api_version(), "skatteetaten.no/v1");
        assert_eq!(actual.kind(), "ApplicationDeployment");
        assert_eq!(actual.metadata(), None);
        assert_eq!(actual.spec(), None);
    }

    #[test]
    fn setters_replace_fields() {
        let mut actual = ApplicationDeployment::new();
        actual.set_api_version("skatteetaten.no/v2");
        actual.set_kind("Other");
        actual.set_spec(Some(spec()));

        assert_eq!(actual.api_version(), "skatteetaten.no/v2");
        assert_eq!(actual.kind(), "Other");
        assert_eq!(actual.spec(), Some(&spec()));

        actual.set_spec(None);
        assert_eq!(actual.spec(), None);
    }

    #[test]
    fn round_trip_through_json_and_yaml() {
        let expected = record();

        let json = serde_json::to_string(&expected).unwrap();
        let actual: ApplicationDeployment = serde_json::from_str(&json).unwrap();
        assert_eq!(actual, expected);

        let yaml = serde_yaml::to_string(&expected).unwrap();
        let actual: ApplicationDeployment = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn absent_fields_are_omitted() {
        let actual = serde_json::to_value(ApplicationDeployment::new()).unwrap();

        assert_eq!(
            actual,
            serde_json::json!({
                "apiVersion": "skatteetaten.no/v1",
                "kind": "ApplicationDeployment",
            })
        );
    }

    #[test]
    fn metadata_only_has_no_spec_key() {
        let actual = serde_json::to_string(&ApplicationDeployment::stub("foo", "bar")).unwrap();

        assert_eq!(
            actual,
            r#"{"apiVersion":"skatteetaten.no/v1","kind":"ApplicationDeployment","metadata":{"name":"foo","namespace":"bar"}}"#
        );
    }

    #[test]
    fn reserializes_document_with_same_keys_in_order() {
        let document = r#"{"apiVersion":"skatteetaten.no/v1","kind":"ApplicationDeployment","metadata":{"name":"foo","namespace":"bar"},"spec":{"applicationId":"abc"}}"#;

        let record: ApplicationDeployment = serde_json::from_str(document).unwrap();
        let actual = serde_json::to_string(&record).unwrap();

        assert_eq!(actual, document);
    }

    #[test]
    fn missing_envelope_keys_fall_back_to_defaults() {
        let record: ApplicationDeployment = serde_yaml::from_str(indoc! {"
            metadata:
              name: foo
            kind: null
        "})
        .unwrap();

        assert_eq!(record.api_version(), "skatteetaten.no/v1");
        assert_eq!(record.kind(), "ApplicationDeployment");
        assert_eq!(record.name_any(), "foo");
    }

    #[test]
    fn status_and_unknown_keys_are_dropped() {
        let record: ApplicationDeployment = serde_yaml::from_str(indoc! {"
            apiVersion: skatteetaten.no/v1
            kind: ApplicationDeployment
            metadata:
              name: foo
              namespace: bar
            spec:
              applicationId: abc
              somethingNew: true
            status:
              phase: Running
            extra:
              - 1
              - 2
        "})
        .unwrap();

        let actual = serde_json::to_value(&record).unwrap();

        assert_eq!(
            actual,
            serde_json::json!({
                "apiVersion": "skatteetaten.no/v1",
                "kind": "ApplicationDeployment",
                "metadata": { "name": "foo", "namespace": "bar" },
                "spec": { "applicationId": "abc" },
            })
        );
    }

    #[test]
    fn explicit_null_metadata_is_absent() {
        let record: ApplicationDeployment =
            serde_json::from_str(r#"{"metadata":null,"spec":null}"#).unwrap();

        assert_eq!(record, ApplicationDeployment::new());
    }

    #[test]
    fn malformed_spec_is_rejected() {
        let actual = serde_json::from_str::<ApplicationDeployment>(r#"{"spec":{"applicationId":1}}"#);

        assert!(actual.is_err());
    }

    #[test]
    fn equal_records_hash_equally() {
        let a = record();
        let b = record();

        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_eq!(hash_of(&a), hash_of(&b));

        let set: HashSet<ApplicationDeployment> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn records_differing_in_any_field_are_unequal() {
        let base = record();

        let mut other = base.clone();
        other.set_api_version("skatteetaten.no/v2");
        assert_ne!(base, other);

        let mut other = base.clone();
        other.set_kind("Other");
        assert_ne!(base, other);

        let mut other = base.clone();
        other.set_metadata(None);
        assert_ne!(base, other);

        let mut other = base.clone();
        other.spec_mut().unwrap().message = Some("changed".to_string());
        assert_ne!(base, other);
    }

    #[test]
    fn metadata_outside_identity_keeps_hash_consistent() {
        let with_generation = |generation| {
            let mut record = record();
            let mut meta = metadata("foo", "bar");
            meta.generation = Some(generation);
            meta.resource_version = Some("42".to_string());
            record.set_metadata(Some(meta));
            record
        };

        let a = with_generation(1);
        let b = with_generation(1);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        // generation is compared but not hashed
        let c = with_generation(2);
        assert_ne!(a, c);
        assert_eq!(hash_of(&a), hash_of(&c));

        let set: HashSet<ApplicationDeployment> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn record_is_never_equal_to_none() {
        let record = record();

        assert_ne!(Some(&record), None);
    }

    #[test]
    fn kube_resource_routes_to_custom_resource_path() {
        assert_eq!(
            ApplicationDeployment::url_path(&(), Some("bar")),
            "/apis/skatteetaten.no/v1/namespaces/bar/applicationdeployments"
        );
        assert_eq!(
            <ApplicationDeployment as Resource>::api_version(&()),
            "skatteetaten.no/v1"
        );
    }

    #[test]
    fn kube_resource_meta_without_metadata() {
        let mut record = ApplicationDeployment::new();

        assert_eq!(record.meta(), &ObjectMeta::default());

        record.meta_mut().name = Some("foo".to_string());
        assert_eq!(record.metadata().and_then(|m| m.name.as_deref()), Some("foo"));
    }

    #[test]
    fn merge_overwrites_present_fields() {
        let mut actual = ApplicationDeployment::stub("foo", "bar");
        actual.merge_from(ApplicationDeployment::with_spec(spec()));

        assert_eq!(actual, record_without_labels());
    }

    fn record_without_labels() -> ApplicationDeployment {
        let mut record = ApplicationDeployment::with_spec(spec());
        record.set_metadata(Some(ObjectMeta {
            name: Some("foo".to_string()),
            namespace: Some("bar".to_string()),
            ..Default::default()
        }));
        record
    }
}
