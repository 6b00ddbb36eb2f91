//! Field descriptors registered by the config type

use super::decode::FromEnv;
use super::naming::EnvNaming;
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

type Setter<T> = Box<dyn Fn(&mut T, &str) -> Result<(), String> + Send + Sync>;

/// A configuration type the filler can populate.
///
/// YAML decoding goes through serde, validation through `validator`, and the
/// environment overlay through the fields listed in [`Fillable::schema`].
pub trait Fillable: Serialize + DeserializeOwned + Validate + 'static {
    /// Fields that can be set from the environment
    fn schema() -> Schema<Self>;
}

/// Per-field options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    required: bool,
    default: Option<String>,
    env_name: Option<String>,
    description: Option<String>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the fill if neither the YAML file nor the environment sets the field
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Raw value applied when neither the YAML file nor the environment sets the field
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Use this key instead of the one derived from the field path
    pub fn env_name(mut self, name: impl Into<String>) -> Self {
        self.env_name = Some(name.into());
        self
    }

    /// Free-form description for usage output
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One settable field of a config type
pub struct Field<T> {
    path: String,
    type_label: String,
    options: FieldOptions,
    setter: Setter<T>,
}

impl<T> Field<T> {
    /// Dotted path, matching the serde/YAML key names
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn type_label(&self) -> &str {
        &self.type_label
    }

    pub fn is_required(&self) -> bool {
        self.options.required
    }

    pub fn default_value(&self) -> Option<&str> {
        self.options.default.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.options.description.as_deref()
    }

    /// Unprefixed environment key for this field
    pub fn env_key(&self, naming: &dyn EnvNaming) -> String {
        match &self.options.env_name {
            Some(name) => name.clone(),
            None => naming.key(&self.path),
        }
    }

    /// Convert `raw` and store it in `target`
    pub(crate) fn assign(&self, target: &mut T, raw: &str) -> Result<(), String> {
        (self.setter)(target, raw)
    }
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("path", &self.path)
            .field("type_label", &self.type_label)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Ordered list of settable fields for `T`
#[derive(Debug)]
pub struct Schema<T> {
    fields: Vec<Field<T>>,
}

impl<T: 'static> Schema<T> {
    /// Create a new schema builder
    pub fn builder() -> SchemaBuilder<T> {
        SchemaBuilder::new()
    }

    pub fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    /// Look up a field by dotted path
    pub fn field(&self, path: &str) -> Option<&Field<T>> {
        self.fields.iter().find(|field| field.path == path)
    }

    /// Render a table of the environment variables this schema reads
    pub fn usage(&self, prefix: &str, naming: &dyn EnvNaming) -> String {
        let header = ["KEY", "TYPE", "DEFAULT", "REQUIRED", "DESCRIPTION"].map(String::from);
        let mut rows = vec![header];

        for field in &self.fields {
            let key = field.env_key(naming);
            let name = naming
                .candidates(prefix, &key)
                .into_iter()
                .next()
                .unwrap_or(key);
            rows.push([
                name,
                field.type_label.clone(),
                field.default_value().unwrap_or_default().to_string(),
                if field.is_required() { "true".to_string() } else { String::new() },
                field.description().unwrap_or_default().to_string(),
            ]);
        }

        let mut widths = [0usize; 5];
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        for row in &rows {
            let line = row
                .iter()
                .zip(widths.iter())
                .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                .collect::<Vec<_>>()
                .join("    ");
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

/// Declarative builder for a [`Schema`]
pub struct SchemaBuilder<T> {
    fields: Vec<Field<T>>,
}

impl<T: 'static> SchemaBuilder<T> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Register a field with default options
    pub fn field<V, A>(self, path: &str, accessor: A) -> Self
    where
        V: FromEnv + 'static,
        A: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.field_with(path, accessor, FieldOptions::new())
    }

    /// Register a field with explicit options
    pub fn field_with<V, A>(mut self, path: &str, accessor: A, options: FieldOptions) -> Self
    where
        V: FromEnv + 'static,
        A: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        let setter = move |target: &mut T, raw: &str| -> Result<(), String> {
            *accessor(target) = V::from_env(raw)?;
            Ok(())
        };

        self.fields.push(Field {
            path: path.to_string(),
            type_label: V::type_label(),
            options,
            setter: Box::new(setter),
        });
        self
    }

    pub fn build(self) -> Schema<T> {
        Schema {
            fields: self.fields,
        }
    }
}

impl<T: 'static> Default for SchemaBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
