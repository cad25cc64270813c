// Model Catalog
// Static catalog served by the models endpoints. Entries mirror a fixed
// snapshot of the upstream list so `created` timestamps are stable.

use super::types::Model;

/// The static model catalog
pub fn catalog() -> Vec<Model> {
    vec![
        Model::new("gpt-4-turbo", 1712361441, "system"),
        Model::new("tts-1", 1681940951, "openai-internal"),
        Model::new("gpt-4-turbo-2024-04-09", 1712601677, "system"),
        Model::new("tts-1-1106", 1699053241, "system"),
        Model::new("o1-preview", 1725648897, "system"),
        Model::new("o1-preview-2024-09-12", 1725648865, "system"),
        Model::new("dall-e-2", 1698798177, "system"),
        Model::new("whisper-1", 1677532384, "openai-internal"),
        Model::new("gpt-3.5-turbo-instruct", 1692901427, "system"),
        Model::new("gpt-4o-mini", 1721172741, "system"),
        Model::new("tts-1-hd", 1699046015, "system"),
        Model::new("gpt-4o-2024-05-13", 1715368132, "system"),
        Model::new("tts-1-hd-1106", 1699053533, "system"),
        Model::new("gpt-3.5-turbo", 1677610602, "openai"),
        Model::new("gpt-3.5-turbo-0125", 1706048358, "system"),
        Model::new("gpt-4o", 1715367049, "system"),
        Model::new("gpt-4", 1687882411, "openai"),
    ]
}

/// Derive a model object for an arbitrary id.
///
/// The lookup is permissive: any id is echoed back rather than 404-ing, so
/// clients can probe models the catalog does not list.
pub fn derive_model(id: &str) -> Model {
    Model::new(id, chrono::Utc::now().timestamp(), "system")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_non_empty_and_stable() {
        let a = catalog();
        let b = catalog();
        assert!(!a.is_empty());
        assert_eq!(a.len(), b.len());
        assert_eq!(a[0].id, "gpt-4-turbo");
        assert_eq!(a[0].created, 1712361441);
    }

    #[test]
    fn test_derive_model_echoes_id() {
        let model = derive_model("my-custom-model");
        assert_eq!(model.id, "my-custom-model");
        assert_eq!(model.object, "model");
        assert_eq!(model.owned_by, "system");
    }
}
