//! Array Node Registration
//!
//! Registers one blueprint node per array algorithm. Each node pulls its
//! arguments from input pins, resolves the named script function on the
//! `Object` pin and forwards to [`array_algorithms`]. A node never panics:
//! missing pins, unresolved functions and algorithm failures are logged and
//! reported as an error output, with the array left as it was.

use std::collections::HashMap;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use array_algorithms::{Callee, ScriptFunction, ScriptObject};
use array_types::{ArrayError, ArrayResult, NodeDef, PinDef, PinType, ScriptArray};

use crate::{ArrayNodesConfig, INDEX_NONE, NodeContext, NodeOutput, NodeRegistry, PinValue};

const TARGET_ARRAY: &str = "TargetArray";
const OBJECT: &str = "Object";
const PREDICATE_NAME: &str = "PredicateName";
const BINARY_PREDICATE_NAME: &str = "BinaryPredicateName";
const COMPARISON_FUNCTION_NAME: &str = "ComparisonFunctionName";
const RETURN_VALUE: &str = "ReturnValue";

// ─────────────────────────────────────────────────────────────────────────────
// Node Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Reasons an array node aborts
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("Missing or ill-typed input pin: {0}")]
    MissingPin(&'static str),

    #[error("Function {function} not found on object {object}")]
    FunctionNotFound { function: String, object: String },

    #[error("Negative index on pin {pin}: {value}")]
    NegativeIndex { pin: &'static str, value: i32 },

    #[error(transparent)]
    Array(#[from] ArrayError),
}

type NodeStep<T> = Result<T, NodeError>;

// ─────────────────────────────────────────────────────────────────────────────
// Registration
// ─────────────────────────────────────────────────────────────────────────────

/// Register all array nodes
pub fn register_array_nodes(registry: &mut NodeRegistry, config: &ArrayNodesConfig) {
    // Queries
    register_search_nodes(registry, config);

    // Extremal elements
    register_extremal_nodes(registry, config);

    // In-place modification
    register_modify_nodes(registry, config);

    register_sample_node(registry, config);
    register_sort_node(registry, config);

    tracing::info!("Registered {} array nodes", registry.len());
}

/// Register a node whose body may fail
///
/// Failures are logged against the node and turned into an error output.
fn register_node<F>(registry: &mut NodeRegistry, definition: NodeDef, body: F)
where
    F: Fn(&mut NodeContext) -> NodeStep<NodeOutput> + Send + Sync + 'static,
{
    let id = definition.id.clone();
    tracing::debug!(
        node = %id,
        inputs = definition.data_inputs().count(),
        "Registering array node"
    );
    registry.register_fn(definition, move |ctx| match body(ctx) {
        Ok(output) => output,
        Err(err) => {
            tracing::error!(node = %ctx.node_id, "{} failed: {}", id, err);
            NodeOutput::error(err.to_string())
        }
    });
}

/// Build the definition of an array node
///
/// Impure nodes get an `exec` input before `pins` and an `exec` output after.
fn array_node(
    category: &str,
    name: &str,
    title: &str,
    pure: bool,
    description: &str,
    keywords: &str,
    pins: Vec<PinDef>,
) -> NodeDef {
    let mut all_pins = Vec::with_capacity(pins.len() + 2);
    if !pure {
        all_pins.push(PinDef::exec_in());
    }
    all_pins.extend(pins);
    if !pure {
        all_pins.push(PinDef::exec_out("exec"));
    }

    NodeDef {
        id: format!("array/{}", name),
        name: title.to_string(),
        category: category.to_string(),
        pure,
        pins: all_pins,
        keywords: keywords.split_whitespace().map(str::to_string).collect(),
        description: Some(description.to_string()),
    }
}

fn target_array_in() -> PinDef {
    PinDef::data_in(TARGET_ARRAY, PinType::wildcard_array()).with_description("Target array")
}

fn target_array_ref() -> PinDef {
    PinDef::data_ref(TARGET_ARRAY, PinType::wildcard_array())
        .with_description("Target array, modified in place")
}

fn object_in() -> PinDef {
    PinDef::data_in(OBJECT, PinType::Object)
        .with_description("Object on which the named function is defined")
}

fn function_name_in(pin: &str, description: &str) -> PinDef {
    PinDef::data_in(pin, PinType::Name).with_description(description)
}

fn unary_predicate_in() -> PinDef {
    function_name_in(
        PREDICATE_NAME,
        "Function taking one element and returning true if it satisfies the condition",
    )
}

fn comparison_in() -> PinDef {
    function_name_in(
        COMPARISON_FUNCTION_NAME,
        "Function taking two elements and returning true if the first is less than the second",
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Pin Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn array_input(ctx: &NodeContext) -> NodeStep<&ScriptArray> {
    ctx.get_input_array(TARGET_ARRAY)
        .ok_or(NodeError::MissingPin(TARGET_ARRAY))
}

fn array_input_mut(ctx: &mut NodeContext) -> NodeStep<&mut ScriptArray> {
    ctx.get_input_array_mut(TARGET_ARRAY)
        .ok_or(NodeError::MissingPin(TARGET_ARRAY))
}

fn integer_input(ctx: &NodeContext, pin: &'static str) -> NodeStep<i32> {
    ctx.get_input_integer(pin).ok_or(NodeError::MissingPin(pin))
}

fn index_input(ctx: &NodeContext, pin: &'static str) -> NodeStep<usize> {
    let value = integer_input(ctx, pin)?;
    usize::try_from(value).map_err(|_| NodeError::NegativeIndex { pin, value })
}

fn element_input(ctx: &NodeContext, pin: &'static str) -> NodeStep<Vec<u8>> {
    ctx.get_input_element(pin)
        .map(<[u8]>::to_vec)
        .ok_or(NodeError::MissingPin(pin))
}

/// Resolve the function named on `name_pin` against the `Object` pin
fn resolve_function(
    ctx: &NodeContext,
    name_pin: &'static str,
) -> NodeStep<(Arc<dyn ScriptObject>, ScriptFunction)> {
    let object = ctx
        .get_input_object(OBJECT)
        .ok_or(NodeError::MissingPin(OBJECT))?;
    let name = ctx
        .get_input_name(name_pin)
        .ok_or(NodeError::MissingPin(name_pin))?;

    match object.find_function(name) {
        Some(function) => Ok((object, function)),
        None => Err(NodeError::FunctionNotFound {
            function: name.to_string(),
            object: object.object_name().to_string(),
        }),
    }
}

fn index_value(index: Option<usize>) -> PinValue {
    let index = index.and_then(|i| i32::try_from(i).ok());
    PinValue::Integer(index.unwrap_or(INDEX_NONE))
}

fn count_value(count: usize) -> PinValue {
    PinValue::Integer(i32::try_from(count).unwrap_or(i32::MAX))
}

fn single(name: &str, value: PinValue) -> HashMap<String, PinValue> {
    let mut values = HashMap::new();
    values.insert(name.to_string(), value);
    values
}

// ─────────────────────────────────────────────────────────────────────────────
// Search Nodes
// ─────────────────────────────────────────────────────────────────────────────

/// Register a pure node that runs `query` with the function named on
/// `name_pin` and returns its result on `ReturnValue`
fn register_query<F>(registry: &mut NodeRegistry, definition: NodeDef, name_pin: &'static str, query: F)
where
    F: Fn(&ScriptArray, Callee<'_>) -> ArrayResult<PinValue> + Send + Sync + 'static,
{
    register_node(registry, definition, move |ctx| {
        let (object, function) = resolve_function(ctx, name_pin)?;
        let array = array_input(ctx)?;
        let value = query(array, Callee::new(&object, &function))?;
        Ok(NodeOutput::pure(single(RETURN_VALUE, value)))
    });
}

fn register_search_nodes(registry: &mut NodeRegistry, config: &ArrayNodesConfig) {
    let category = config.category.as_str();

    // AdjacentFind
    register_query(
        registry,
        array_node(
            category,
            "AdjacentFind",
            "Adj. FIND",
            true,
            "Index of the first element of the first adjacent pair satisfying the predicate",
            "adjacent find predicate",
            vec![
                target_array_in(),
                object_in(),
                function_name_in(
                    BINARY_PREDICATE_NAME,
                    "Function taking two elements and returning true if the pair satisfies the condition",
                ),
                PinDef::data_out(RETURN_VALUE, PinType::Integer),
            ],
        ),
        BINARY_PREDICATE_NAME,
        |array, callee| array_algorithms::adjacent_find(array, callee).map(index_value),
    );

    // AllSatisfy
    register_query(
        registry,
        array_node(
            category,
            "AllSatisfy",
            "ALL",
            true,
            "Check whether every element satisfies the predicate",
            "all of predicate condition",
            vec![
                target_array_in(),
                object_in(),
                unary_predicate_in(),
                PinDef::data_out(RETURN_VALUE, PinType::Boolean),
            ],
        ),
        PREDICATE_NAME,
        |array, callee| array_algorithms::all_satisfy(array, callee).map(PinValue::Boolean),
    );

    // AnySatisfy
    register_query(
        registry,
        array_node(
            category,
            "AnySatisfy",
            "ANY",
            true,
            "Check whether any element satisfies the predicate",
            "any of predicate condition",
            vec![
                target_array_in(),
                object_in(),
                unary_predicate_in(),
                PinDef::data_out(RETURN_VALUE, PinType::Boolean),
            ],
        ),
        PREDICATE_NAME,
        |array, callee| array_algorithms::any_satisfy(array, callee).map(PinValue::Boolean),
    );

    // NoneSatisfy
    register_query(
        registry,
        array_node(
            category,
            "NoneSatisfy",
            "NONE",
            true,
            "Check whether no element satisfies the predicate",
            "none of predicate condition",
            vec![
                target_array_in(),
                object_in(),
                unary_predicate_in(),
                PinDef::data_out(RETURN_VALUE, PinType::Boolean),
            ],
        ),
        PREDICATE_NAME,
        |array, callee| array_algorithms::none_satisfy(array, callee).map(PinValue::Boolean),
    );

    // Count (identity, no script function)
    register_node(
        registry,
        array_node(
            category,
            "Count",
            "COUNT",
            true,
            "Count the elements identical to the given item",
            "count",
            vec![
                target_array_in(),
                PinDef::data_in("ItemToCount", PinType::Wildcard),
                PinDef::data_out(RETURN_VALUE, PinType::Integer),
            ],
        ),
        |ctx| {
            let item = element_input(ctx, "ItemToCount")?;
            let count = array_algorithms::count(array_input(ctx)?, &item)?;
            Ok(NodeOutput::pure(single(RETURN_VALUE, count_value(count))))
        },
    );

    // CountIf
    register_query(
        registry,
        array_node(
            category,
            "CountIf",
            "COUNT IF",
            true,
            "Count the elements satisfying the predicate",
            "count if predicate condition",
            vec![
                target_array_in(),
                object_in(),
                unary_predicate_in(),
                PinDef::data_out(RETURN_VALUE, PinType::Integer),
            ],
        ),
        PREDICATE_NAME,
        |array, callee| array_algorithms::count_if(array, callee).map(count_value),
    );

    // FindIf
    register_query(
        registry,
        array_node(
            category,
            "FindIf",
            "FIND IF",
            true,
            "Index of the first element satisfying the predicate",
            "find if predicate condition",
            vec![
                target_array_in(),
                object_in(),
                unary_predicate_in(),
                PinDef::data_out(RETURN_VALUE, PinType::Integer),
            ],
        ),
        PREDICATE_NAME,
        |array, callee| array_algorithms::find_if(array, callee).map(index_value),
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Extremal Nodes
// ─────────────────────────────────────────────────────────────────────────────

fn register_extremal_nodes(registry: &mut NodeRegistry, config: &ArrayNodesConfig) {
    let category = config.category.as_str();

    // MaxElementIndex
    register_query(
        registry,
        array_node(
            category,
            "MaxElementIndex",
            "MAX Elem. INDEX",
            true,
            "Index of the first maximum element under the comparison function",
            "max maximum elem element index predicate compare comparison",
            vec![
                target_array_in(),
                object_in(),
                comparison_in(),
                PinDef::data_out(RETURN_VALUE, PinType::Integer),
            ],
        ),
        COMPARISON_FUNCTION_NAME,
        |array, callee| array_algorithms::max_element_index(array, callee).map(index_value),
    );

    // MinElementIndex
    register_query(
        registry,
        array_node(
            category,
            "MinElementIndex",
            "MIN Elem. INDEX",
            true,
            "Index of the first minimum element under the comparison function",
            "min minimum elem element index predicate compare comparison",
            vec![
                target_array_in(),
                object_in(),
                comparison_in(),
                PinDef::data_out(RETURN_VALUE, PinType::Integer),
            ],
        ),
        COMPARISON_FUNCTION_NAME,
        |array, callee| array_algorithms::min_element_index(array, callee).map(index_value),
    );

    // Max: the output pin is only written for a non-empty array
    register_node(
        registry,
        array_node(
            category,
            "Max",
            "MAX",
            true,
            "Maximum element under the comparison function",
            "max maximum predicate compare comparison",
            vec![
                target_array_in(),
                object_in(),
                comparison_in(),
                PinDef::data_out("MaxValue", PinType::Wildcard),
            ],
        ),
        |ctx| {
            let (object, function) = resolve_function(ctx, COMPARISON_FUNCTION_NAME)?;
            let array = array_input(ctx)?;
            let max = array_algorithms::max(array, Callee::new(&object, &function))?;
            let values = match max {
                Some(element) => single("MaxValue", PinValue::Element(element.bytes().to_vec())),
                None => HashMap::new(),
            };
            Ok(NodeOutput::pure(values))
        },
    );

    // Min: the output pin is only written for a non-empty array
    register_node(
        registry,
        array_node(
            category,
            "Min",
            "MIN",
            true,
            "Minimum element under the comparison function",
            "min minimum predicate compare comparison",
            vec![
                target_array_in(),
                object_in(),
                comparison_in(),
                PinDef::data_out("MinValue", PinType::Wildcard),
            ],
        ),
        |ctx| {
            let (object, function) = resolve_function(ctx, COMPARISON_FUNCTION_NAME)?;
            let array = array_input(ctx)?;
            let min = array_algorithms::min(array, Callee::new(&object, &function))?;
            let values = match min {
                Some(element) => single("MinValue", PinValue::Element(element.bytes().to_vec())),
                None => HashMap::new(),
            };
            Ok(NodeOutput::pure(values))
        },
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Modify Nodes
// ─────────────────────────────────────────────────────────────────────────────

fn register_modify_nodes(registry: &mut NodeRegistry, config: &ArrayNodesConfig) {
    let category = config.category.as_str();

    // Fill
    register_node(
        registry,
        array_node(
            category,
            "Fill",
            "FILL",
            false,
            "Overwrite every element with the value",
            "fill set all",
            vec![
                target_array_ref(),
                PinDef::data_in("Value", PinType::Wildcard),
            ],
        ),
        |ctx| {
            let value = element_input(ctx, "Value")?;
            array_algorithms::fill(array_input_mut(ctx)?, &value)?;
            Ok(NodeOutput::continue_default(HashMap::new()))
        },
    );

    // FillRange
    register_node(
        registry,
        array_node(
            category,
            "FillRange",
            "Fill Range",
            false,
            "Overwrite the elements in [StartIndex, EndIndex) with the value",
            "fill set range",
            vec![
                target_array_ref(),
                PinDef::data_in("StartIndex", PinType::Integer),
                PinDef::data_in("EndIndex", PinType::Integer),
                PinDef::data_in("Value", PinType::Wildcard),
            ],
        ),
        |ctx| {
            let start = index_input(ctx, "StartIndex")?;
            let end = index_input(ctx, "EndIndex")?;
            let value = element_input(ctx, "Value")?;
            array_algorithms::fill_range(array_input_mut(ctx)?, start..end, &value)?;
            Ok(NodeOutput::continue_default(HashMap::new()))
        },
    );

    // RemoveRange
    register_node(
        registry,
        array_node(
            category,
            "RemoveRange",
            "Remove Range",
            false,
            "Remove the elements in [StartIndex, EndIndex)",
            "remove delete erase range between",
            vec![
                target_array_ref(),
                PinDef::data_in("StartIndex", PinType::Integer),
                PinDef::data_in("EndIndex", PinType::Integer),
            ],
        ),
        |ctx| {
            let start = index_input(ctx, "StartIndex")?;
            let end = index_input(ctx, "EndIndex")?;
            array_algorithms::remove_range(array_input_mut(ctx)?, start..end)?;
            Ok(NodeOutput::continue_default(HashMap::new()))
        },
    );

    // RemoveIf
    register_node(
        registry,
        array_node(
            category,
            "RemoveIf",
            "REMOVE IF",
            false,
            "Remove every element satisfying the predicate",
            "remove delete erase if predicate condition",
            vec![target_array_ref(), object_in(), unary_predicate_in()],
        ),
        |ctx| {
            let (object, function) = resolve_function(ctx, PREDICATE_NAME)?;
            let array = array_input_mut(ctx)?;
            array_algorithms::remove_if(array, Callee::new(&object, &function))?;
            Ok(NodeOutput::continue_default(HashMap::new()))
        },
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Sample and Sort Nodes
// ─────────────────────────────────────────────────────────────────────────────

fn register_sample_node(registry: &mut NodeRegistry, config: &ArrayNodesConfig) {
    let seed = config.random_seed;

    register_node(
        registry,
        array_node(
            &config.category,
            "RandomSample",
            "Random Sample",
            false,
            "Randomly split the array into the requested number of samples and the rest",
            "random sample items",
            vec![
                target_array_in(),
                PinDef::data_in("NumOfSamples", PinType::Integer),
                PinDef::data_out("Samples", PinType::wildcard_array()),
                PinDef::data_out("Others", PinType::wildcard_array()),
            ],
        ),
        move |ctx| {
            // A negative count reads as unsigned, so it asks for every element
            let count = usize::try_from(integer_input(ctx, "NumOfSamples")?).unwrap_or(usize::MAX);
            let array = array_input(ctx)?;

            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let sample = array_algorithms::random_sample(array, count, &mut rng)?;

            let mut values = HashMap::new();
            values.insert("Samples".to_string(), PinValue::Array(sample.samples));
            values.insert("Others".to_string(), PinValue::Array(sample.others));
            Ok(NodeOutput::continue_default(values))
        },
    );
}

fn register_sort_node(registry: &mut NodeRegistry, config: &ArrayNodesConfig) {
    register_node(
        registry,
        array_node(
            &config.sort_category(),
            "SortAnyArray",
            "SORT",
            false,
            "Sort the array in the order defined by the comparison function",
            "sort order arrange predicate compare comparison",
            vec![
                target_array_ref(),
                object_in(),
                function_name_in(
                    COMPARISON_FUNCTION_NAME,
                    "Function taking two elements and returning true if the first should precede the second",
                ),
            ],
        ),
        |ctx| {
            let (object, function) = resolve_function(ctx, COMPARISON_FUNCTION_NAME)?;
            let array = array_input_mut(ctx)?;
            array_algorithms::sort(array, Callee::new(&object, &function))?;
            Ok(NodeOutput::continue_default(HashMap::new()))
        },
    );
}
