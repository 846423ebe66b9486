//! ABI descriptions and the overload table
//!
//! An [`Interface`] is built once from a JSON ABI. Functions sharing a name
//! form an overload set kept in declaration order; callers pick an overload
//! by argument count ([`Interface::resolve`]), by type list
//! ([`Interface::function_by_types`]) or by full signature
//! ([`Interface::function_by_signature`]).

use std::collections::HashMap;

use abicodec_primitives::H256;
use bytes::Bytes;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::abi::{
    decode_with, display_name, encode_params_with, function_selector, parse_type, signature,
    tokenize_all, ParamType, Token,
};
use crate::event::{DecodedEvent, Event, RawLog};
use crate::{AbiError, CodecOptions, Layout};

/// Entry kind in a JSON ABI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Callable function (the default when `type` is absent)
    #[default]
    Function,
    /// Contract constructor
    Constructor,
    /// Log event
    Event,
    /// Fallback function
    Fallback,
    /// Any other kind; ignored
    #[serde(other)]
    Other,
}

/// One input or output in a JSON ABI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    /// Parameter name, may be empty
    #[serde(default)]
    pub name: String,
    /// Type string
    #[serde(rename = "type")]
    pub kind: String,
    /// Event inputs only
    #[serde(default)]
    pub indexed: bool,
}

/// One entry of a JSON ABI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiEntry {
    /// Entry kind
    #[serde(rename = "type", default)]
    pub kind: EntryKind,
    /// Name, possibly carrying its own parameter list
    #[serde(default)]
    pub name: String,
    /// Inputs
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    /// Outputs
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    /// Read-only function
    #[serde(default)]
    pub constant: bool,
    /// Event without a signature topic
    #[serde(default)]
    pub anonymous: bool,
}

/// A parsed parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name, may be empty
    pub name: String,
    /// Parsed type
    pub kind: ParamType,
    /// Indexed event input
    pub indexed: bool,
}

impl Param {
    /// Create a non-indexed parameter
    pub fn new(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: name.into(),
            kind,
            indexed: false,
        }
    }

    /// Mark as an indexed event input
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    fn parse(param: &AbiParam) -> Result<Self, AbiError> {
        Ok(Self {
            name: param.name.clone(),
            kind: parse_type(&param.kind)?,
            indexed: param.indexed,
        })
    }
}

pub(crate) fn parse_params(params: &[AbiParam]) -> Result<Vec<Param>, AbiError> {
    params.iter().map(Param::parse).collect()
}

pub(crate) fn types_of(params: &[Param]) -> Vec<ParamType> {
    params.iter().map(|p| p.kind.clone()).collect()
}

/// A callable function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Display name (without parameter list)
    pub name: String,
    /// Signature hashed into the selector
    pub signature: String,
    /// First 4 bytes of keccak256(signature)
    pub selector: [u8; 4],
    /// Inputs
    pub inputs: Vec<Param>,
    /// Outputs
    pub outputs: Vec<Param>,
    /// Read-only function, invoked with `eth_call`
    pub constant: bool,
    layout: Layout,
}

impl Function {
    /// Create a function with the standard layout
    pub fn new(name: &str, inputs: Vec<Param>, outputs: Vec<Param>, constant: bool) -> Self {
        let signature = signature(name, &types_of(&inputs));
        let selector = function_selector(&signature);
        Self {
            name: display_name(name).to_string(),
            signature,
            selector,
            inputs,
            outputs,
            constant,
            layout: Layout::Standard,
        }
    }

    fn from_entry(entry: &AbiEntry) -> Result<Self, AbiError> {
        Ok(Self::new(
            &entry.name,
            parse_params(&entry.inputs)?,
            parse_params(&entry.outputs)?,
            entry.constant,
        ))
    }

    /// Input types
    pub fn input_types(&self) -> Vec<ParamType> {
        types_of(&self.inputs)
    }

    /// Output types
    pub fn output_types(&self) -> Vec<ParamType> {
        types_of(&self.outputs)
    }

    /// Canonical input types joined by `,`, the key of this overload
    pub fn type_key(&self) -> String {
        self.inputs
            .iter()
            .map(|p| p.kind.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Layout used for parameters and return values
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Selector followed by the encoded arguments
    pub fn encode_input(&self, args: &[Token]) -> Result<Bytes, AbiError> {
        let mut data = self.selector.to_vec();
        data.extend(encode_params_with(self.layout, &self.input_types(), args)?);
        Ok(Bytes::from(data))
    }

    /// [`Function::encode_input`] from JSON values
    pub fn encode_input_json(&self, args: &[Value]) -> Result<Bytes, AbiError> {
        let tokens = tokenize_all(&self.input_types(), args)?;
        self.encode_input(&tokens)
    }

    /// Decode call data (selector included) back into arguments
    pub fn decode_input(&self, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        match data.split_first_chunk::<4>() {
            Some((selector, rest)) if *selector == self.selector => {
                decode_with(self.layout, &self.input_types(), rest)
            }
            Some(_) => Err(AbiError::Decoding(format!(
                "selector does not match {}",
                self.signature
            ))),
            None => Err(AbiError::Decoding("call data shorter than a selector".to_string())),
        }
    }

    /// Decode return data
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        decode_with(self.layout, &self.output_types(), data)
    }

    /// Decode return data into `name -> value`, unnamed outputs keyed by position
    pub fn decode_output_named(&self, data: &[u8]) -> Result<IndexMap<String, Token>, AbiError> {
        let tokens = self.decode_output(data)?;
        Ok(name_tokens(&self.outputs, tokens))
    }
}

pub(crate) fn name_tokens<'a>(
    params: impl IntoIterator<Item = &'a Param>,
    tokens: Vec<Token>,
) -> IndexMap<String, Token> {
    params
        .into_iter()
        .zip(tokens)
        .enumerate()
        .map(|(i, (param, token))| {
            let key = if param.name.is_empty() {
                i.to_string()
            } else {
                param.name.clone()
            };
            (key, token)
        })
        .collect()
}

/// Contract interface: functions, constructor and events of one ABI
#[derive(Debug, Clone, Default)]
pub struct Interface {
    functions: Vec<Function>,
    by_name: IndexMap<String, Vec<usize>>,
    by_signature: HashMap<String, usize>,
    constructor: Option<Vec<Param>>,
    events: Vec<Event>,
    options: CodecOptions,
}

impl Interface {
    /// Parse a JSON ABI (an array of entries)
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        let entries: Vec<AbiEntry> = serde_json::from_str(json)?;
        Self::from_entries(&entries)
    }

    /// Build from already deserialized entries
    pub fn from_entries(entries: &[AbiEntry]) -> Result<Self, AbiError> {
        let mut interface = Interface::default();

        for entry in entries {
            match entry.kind {
                EntryKind::Function => interface.add_function(Function::from_entry(entry)?),
                EntryKind::Constructor => {
                    interface.constructor = Some(parse_params(&entry.inputs)?);
                }
                EntryKind::Event => interface.events.push(Event::from_entry(entry)?),
                EntryKind::Fallback | EntryKind::Other => {}
            }
        }

        debug!(
            functions = interface.functions.len(),
            events = interface.events.len(),
            "Built interface"
        );
        Ok(interface)
    }

    /// Apply codec options to every function and event
    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        for function in &mut self.functions {
            function.layout = options.layout;
        }
        for event in &mut self.events {
            event.set_layout(options.layout);
        }
        self
    }

    /// Options in effect
    pub fn options(&self) -> CodecOptions {
        self.options
    }

    /// Add a function, builder style
    pub fn with_function(mut self, function: Function) -> Self {
        self.add_function(function);
        self
    }

    /// Add an event, builder style
    pub fn with_event(mut self, mut event: Event) -> Self {
        event.set_layout(self.options.layout);
        self.events.push(event);
        self
    }

    fn add_function(&mut self, mut function: Function) {
        function.layout = self.options.layout;
        if self.by_signature.contains_key(&function.signature) {
            warn!(signature = %function.signature, "Duplicate function signature, keeping the first");
            return;
        }
        let index = self.functions.len();
        self.by_signature.insert(function.signature.clone(), index);
        self.by_name
            .entry(function.name.clone())
            .or_default()
            .push(index);
        self.functions.push(function);
    }

    /// All functions in declaration order
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Overloads sharing a display name, in declaration order
    pub fn overloads(&self, name: &str) -> impl Iterator<Item = &Function> {
        self.by_name
            .get(name)
            .into_iter()
            .flatten()
            .map(move |&i| &self.functions[i])
    }

    /// First declared overload of `name` taking `arg_count` arguments
    pub fn resolve(&self, name: &str, arg_count: usize) -> Option<&Function> {
        self.overloads(name).find(|f| f.inputs.len() == arg_count)
    }

    /// Overload of `name` whose inputs are exactly `types`
    pub fn function_by_types(&self, name: &str, types: &[&str]) -> Result<Option<&Function>, AbiError> {
        let key = types
            .iter()
            .map(|t| parse_type(t).map(|p| p.to_string()))
            .collect::<Result<Vec<_>, _>>()?
            .join(",");
        Ok(self.overloads(name).find(|f| f.type_key() == key))
    }

    /// Function by its exact signature, e.g. `"test(uint256)"`
    pub fn function_by_signature(&self, signature: &str) -> Option<&Function> {
        self.by_signature.get(signature).map(|&i| &self.functions[i])
    }

    /// Function whose selector matches the start of `data`
    pub fn function_by_selector(&self, selector: [u8; 4]) -> Option<&Function> {
        self.functions.iter().find(|f| f.selector == selector)
    }

    /// Resolve `name` (a display name or a full signature) for `arg_count` arguments
    pub fn lookup(&self, name: &str, arg_count: usize) -> Option<&Function> {
        if name.contains('(') {
            self.function_by_signature(name)
        } else {
            self.resolve(name, arg_count)
        }
    }

    /// Encode a call from JSON arguments
    ///
    /// When no overload accepts the arguments, a warning is logged and empty
    /// call data is returned, unless `strict_overloads` is set.
    pub fn encode_call(&self, name: &str, args: &[Value]) -> Result<Bytes, AbiError> {
        match self.lookup(name, args.len()) {
            Some(function) => function.encode_input_json(args),
            None => self.overload_miss(name, args.len()),
        }
    }

    /// Encode a call from tokens
    pub fn encode_call_tokens(&self, name: &str, args: &[Token]) -> Result<Bytes, AbiError> {
        match self.lookup(name, args.len()) {
            Some(function) => function.encode_input(args),
            None => self.overload_miss(name, args.len()),
        }
    }

    fn overload_miss(&self, name: &str, args: usize) -> Result<Bytes, AbiError> {
        if self.options.strict_overloads {
            return Err(AbiError::OverloadResolution {
                name: name.to_string(),
                args,
            });
        }
        warn!(name, args, "No matching function overload, returning empty call data");
        Ok(Bytes::new())
    }

    /// Decode return data of the first overload named `name`
    pub fn decode_output(&self, name: &str, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        let function = if name.contains('(') {
            self.function_by_signature(name)
        } else {
            self.overloads(name).next()
        };
        function
            .ok_or_else(|| AbiError::Decoding(format!("Unknown function: {}", name)))?
            .decode_output(data)
    }

    /// Constructor inputs, if declared
    pub fn constructor(&self) -> Option<&[Param]> {
        self.constructor.as_deref()
    }

    /// Deployment data: bytecode followed by the encoded constructor arguments
    pub fn encode_constructor(&self, bytecode: &[u8], args: &[Value]) -> Result<Bytes, AbiError> {
        let mut data = bytecode.to_vec();
        match &self.constructor {
            Some(inputs) => {
                let types = types_of(inputs);
                let tokens = tokenize_all(&types, args)?;
                data.extend(encode_params_with(self.options.layout, &types, &tokens)?);
            }
            None if args.is_empty() => {}
            None => {
                return Err(AbiError::Encoding(format!(
                    "no constructor declared, got {} argument(s)",
                    args.len()
                )))
            }
        }
        Ok(Bytes::from(data))
    }

    /// All events in declaration order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Event by display name
    pub fn event(&self, name: &str) -> Result<&Event, AbiError> {
        self.events
            .iter()
            .find(|e| e.name == name || e.signature == name)
            .ok_or_else(|| AbiError::UnknownEvent(name.to_string()))
    }

    /// Non-anonymous event whose signature hash is `topic`
    pub fn event_by_topic(&self, topic: &H256) -> Option<&Event> {
        self.events
            .iter()
            .find(|e| !e.anonymous && e.topic() == *topic)
    }

    /// Decode a log, dispatching on its first topic
    pub fn decode_log(&self, log: &RawLog) -> Result<DecodedEvent, AbiError> {
        let topic = log
            .topics
            .first()
            .ok_or_else(|| AbiError::Decoding("log has no topics".to_string()))?;
        match self.event_by_topic(topic) {
            Some(event) => event.decode_log(log),
            None => {
                warn!(%topic, "No event matches log topic");
                Err(AbiError::UnknownEvent(topic.to_hex()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const OVERLOADED: &str = r#"[
        {"name":"test","type":"function","inputs":[{"name":"a","type":"uint256"}],"outputs":[{"name":"d","type":"uint256"}]},
        {"name":"test","type":"function","inputs":[{"name":"a","type":"string"}],"outputs":[{"name":"d","type":"uint256"}]},
        {"name":"test","type":"function","inputs":[{"name":"a","type":"uint256"},{"name":"b","type":"bool"}],"outputs":[]},
        {"type":"constructor","inputs":[{"name":"supply","type":"uint256"}]},
        {"name":"Ping","type":"event","inputs":[{"name":"n","type":"uint256","indexed":true}]},
        {"type":"fallback"},
        {"type":"receive"}
    ]"#;

    fn overloaded() -> Interface {
        Interface::from_json(OVERLOADED).unwrap()
    }

    // ==================== Parsing ====================

    #[test]
    fn test_from_json() {
        let iface = overloaded();
        assert_eq!(iface.functions().len(), 3);
        assert_eq!(iface.events().len(), 1);
        assert_eq!(iface.constructor().map(|c| c.len()), Some(1));
    }

    #[test]
    fn test_from_json_invalid_type() {
        let result = Interface::from_json(r#"[{"name":"f","inputs":[{"type":"uin"}]}]"#);
        assert!(matches!(result, Err(AbiError::InvalidType(_))));
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(Interface::from_json("{"), Err(AbiError::Json(_))));
    }

    #[test]
    fn test_type_defaults_to_function() {
        let iface = Interface::from_json(r#"[{"name":"f","inputs":[]}]"#).unwrap();
        assert!(iface.resolve("f", 0).is_some());
    }

    // ==================== Overload table ====================

    #[test]
    fn test_resolve_by_count() {
        let iface = overloaded();
        assert_eq!(iface.resolve("test", 1).unwrap().signature, "test(uint256)");
        assert_eq!(iface.resolve("test", 2).unwrap().signature, "test(uint256,bool)");
        assert!(iface.resolve("test", 3).is_none());
        assert!(iface.resolve("missing", 0).is_none());
    }

    #[test]
    fn test_function_by_types() {
        let iface = overloaded();
        let by_uint = iface.function_by_types("test", &["uint"]).unwrap().unwrap();
        let by_string = iface.function_by_types("test", &["string"]).unwrap().unwrap();
        assert_eq!(by_uint.signature, "test(uint256)");
        assert_eq!(by_string.signature, "test(string)");
        assert_ne!(by_uint.selector, by_string.selector);
        assert!(iface.function_by_types("test", &["bool"]).unwrap().is_none());
    }

    #[test]
    fn test_function_by_signature() {
        let iface = overloaded();
        assert!(iface.function_by_signature("test(string)").is_some());
        assert!(iface.function_by_signature("test(bytes)").is_none());
    }

    #[test]
    fn test_verbatim_legacy_name() {
        let iface = Interface::from_json(
            r#"[{"name":"helloworld(int)","type":"function","inputs":[{"type":"int"}],"outputs":[]}]"#,
        )
        .unwrap();
        let by_name = iface.resolve("helloworld", 1).unwrap();
        let by_types = iface.function_by_types("helloworld", &["int"]).unwrap().unwrap();
        assert_eq!(by_name.signature, "helloworld(int)");
        assert_eq!(by_name, by_types);
        assert_eq!(by_name.selector, function_selector("helloworld(int)"));
    }

    // ==================== Encoding calls ====================

    #[test]
    fn test_encode_call_selects_overload() {
        let iface = overloaded();
        let data = iface.encode_call("test", &[json!(1), json!(true)]).unwrap();
        assert_eq!(&data[..4], &function_selector("test(uint256,bool)"));
        assert_eq!(data.len(), 4 + 64);

        let data = iface.encode_call("test(string)", &[json!("hi")]).unwrap();
        assert_eq!(&data[..4], &function_selector("test(string)"));
    }

    #[test]
    fn test_encode_call_soft_miss() {
        let iface = overloaded();
        let data = iface.encode_call("test", &[json!(1), json!(2), json!(3)]).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_encode_call_strict_miss() {
        let iface = overloaded().with_options(CodecOptions::default().strict(true));
        match iface.encode_call("test", &[json!(1), json!(2), json!(3)]) {
            Err(AbiError::OverloadResolution { name, args }) => {
                assert_eq!(name, "test");
                assert_eq!(args, 3);
            }
            other => panic!("Expected OverloadResolution error, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_call_bad_value_is_error() {
        let iface = overloaded();
        let result = iface.encode_call("test", &[json!(1), json!("maybe")]);
        assert!(matches!(result, Err(AbiError::Encoding(_))));
    }

    #[test]
    fn test_decode_input_round_trip() {
        let iface = overloaded();
        let function = iface.resolve("test", 2).unwrap();
        let data = function
            .encode_input(&[Token::uint256_from_u128(5), Token::Bool(true)])
            .unwrap();
        assert_eq!(
            function.decode_input(&data).unwrap(),
            vec![Token::uint256_from_u128(5), Token::Bool(true)]
        );
        assert_eq!(
            iface.function_by_selector(function.selector).map(|f| &f.signature),
            Some(&function.signature)
        );

        let other = iface.resolve("test", 1).unwrap();
        assert!(matches!(other.decode_input(&data), Err(AbiError::Decoding(_))));
        assert!(matches!(other.decode_input(&[1, 2]), Err(AbiError::Decoding(_))));
    }

    #[test]
    fn test_decode_output() {
        let iface = overloaded();
        let mut data = [0u8; 32];
        data[31] = 5;
        assert_eq!(
            iface.decode_output("test", &data).unwrap(),
            vec![Token::uint256_from_u128(5)]
        );
        let named = iface.resolve("test", 1).unwrap().decode_output_named(&data).unwrap();
        assert_eq!(named.get("d"), Some(&Token::uint256_from_u128(5)));
        assert!(iface.decode_output("missing", &data).is_err());
    }

    // ==================== Constructor / events ====================

    #[test]
    fn test_encode_constructor() {
        let iface = overloaded();
        let data = iface.encode_constructor(&[0x60, 0x80], &[json!(1000)]).unwrap();
        assert_eq!(&data[..2], &[0x60, 0x80]);
        assert_eq!(data.len(), 2 + 32);
        assert_eq!(&data[32..], &[0x03, 0xe8]);
    }

    #[test]
    fn test_encode_constructor_without_declaration() {
        let iface = Interface::from_json("[]").unwrap();
        assert_eq!(iface.encode_constructor(&[0x60], &[]).unwrap().as_ref(), &[0x60]);
        assert!(iface.encode_constructor(&[0x60], &[json!(1)]).is_err());
    }

    #[test]
    fn test_event_lookup() {
        let iface = overloaded();
        let event = iface.event("Ping").unwrap();
        assert_eq!(event.signature, "Ping(uint256)");
        assert!(iface.event_by_topic(&event.topic()).is_some());
        assert!(matches!(iface.event("Pong"), Err(AbiError::UnknownEvent(_))));
    }

    #[test]
    fn test_with_options_applies_layout() {
        let iface = overloaded().with_options(CodecOptions::legacy());
        assert_eq!(iface.resolve("test", 1).unwrap().layout(), Layout::Legacy);
        assert_eq!(iface.options().layout, Layout::Legacy);
    }
}
