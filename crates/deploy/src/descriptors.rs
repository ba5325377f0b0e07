//! Static registry of the tools and knowledge sources the assistant gets.
//!
//! Descriptors exist only at provisioning time; the management API is the
//! system of record once they are registered. Input schemas are canonical
//! JSON Schema documents so the platform can validate tool arguments.

use serde_json::{Value, json};

/// A webhook tool the assistant can call.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    /// Display name; also the idempotency key for reruns.
    pub name: &'static str,
    /// Usage instructions surfaced to the assistant.
    pub description: &'static str,
    /// HTTP method the platform uses to call the tool.
    pub method: &'static str,
    /// Route path under the webhook base URL.
    pub path: &'static str,
    /// JSON Schema for the tool's arguments, when it takes any.
    pub input_schema: Option<Value>,
}

impl ToolDescriptor {
    /// Full URL of the tool under the given webhook base URL.
    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path)
    }
}

/// A knowledge source attached to the assistant.
#[derive(Debug, Clone)]
pub struct KnowledgeDescriptor {
    /// Display name; also the idempotency key for reruns.
    pub name: &'static str,
    /// What the source covers.
    pub description: &'static str,
    /// Source type understood by the management API.
    pub kind: &'static str,
    /// Source location (URL for web crawls).
    pub source: &'static str,
}

/// The seven webhook tools the assistant is provisioned with.
#[must_use]
pub fn tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: "Customer Lookup",
            description: "Use this tool at the beginning of every conversation to learn about the customer.\n\nTool Rules:\n - Mandatory at conversation start\n - Accessible fields: first name, last name, address, email, phone\n - Use to personalize greeting",
            method: "GET",
            path: "/tools/customer-lookup",
            input_schema: None,
        },
        ToolDescriptor {
            name: "Order Look Up",
            description: "Use this tool to look up the customers order. ALWAYS ask the user to confirm the last four characters of their order number to ensure you are referencing the correct one.",
            method: "GET",
            path: "/tools/order-lookup",
            input_schema: Some(json!({
                "type": "object",
                "properties": {
                    "order_confirmation_digits": {
                        "type": "string",
                        "description": "The last four characters of the order number"
                    }
                },
                "required": ["order_confirmation_digits"]
            })),
        },
        ToolDescriptor {
            name: "Return Order",
            description: "Use this tool to return a customers order using the order id. Only use this tool if the order status is \"delivered\".",
            method: "POST",
            path: "/tools/return-order",
            input_schema: Some(json!({
                "type": "object",
                "properties": {
                    "order_id": {
                        "type": "string",
                        "description": "The order id to return"
                    },
                    "return_reason": {
                        "type": "string",
                        "description": "Why the customer is returning the order"
                    }
                },
                "required": ["order_id", "return_reason"]
            })),
        },
        ToolDescriptor {
            name: "Customer Survey",
            description: "Use this tool when you have conducted the customer survey after you have handled all the users questions and requests. ALWAYS use this tool before ending the conversation.",
            method: "POST",
            path: "/tools/create-survey",
            input_schema: Some(json!({
                "type": "object",
                "properties": {
                    "rating": {
                        "type": "integer",
                        "description": "The rating the user gave",
                        "minimum": 1,
                        "maximum": 5
                    },
                    "feedback": {
                        "type": "string",
                        "description": "The feedback the user gave"
                    }
                },
                "required": ["rating"]
            })),
        },
        ToolDescriptor {
            name: "Product Inventory",
            description: "Use this tool to provide product recommendations to the user.",
            method: "GET",
            path: "/tools/products",
            input_schema: None,
        },
        ToolDescriptor {
            name: "Send to Flex",
            description: "Use this tool when the user wants to speak with a supervisor or when you are not able to fulfill their request. ALWAYS tell the user you are transferring them to a Supervisor before using this tool.",
            method: "GET",
            path: "/tools/send-to-flex",
            input_schema: None,
        },
        ToolDescriptor {
            name: "Place Order",
            description: "Use this tool to place an order. ALWAYS confirm with the user if you'd like to place the order using the same billing and shipping information as their last order.",
            method: "POST",
            path: "/tools/place-order",
            input_schema: Some(json!({
                "type": "object",
                "properties": {
                    "product_id": {
                        "type": "string",
                        "description": "The product id to order"
                    }
                },
                "required": ["product_id"]
            })),
        },
    ]
}

/// Knowledge sources attached to the assistant.
#[must_use]
pub fn knowledge() -> Vec<KnowledgeDescriptor> {
    vec![KnowledgeDescriptor {
        name: "Owl Shoes Website",
        description: "Product catalog, store policies, and FAQ from the Owl Shoes website. Use this to answer general questions about products, shipping, and returns.",
        kind: "Web",
        source: "https://owlshoes.example",
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_seven_tools_with_unique_names() {
        let tools = tools();
        assert_eq!(tools.len(), 7);

        let mut names: Vec<_> = tools.iter().map(|t| t.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 7);
    }

    #[test]
    fn tool_urls_live_under_the_base_url() {
        for tool in tools() {
            let url = tool.url("https://hooks.owlshoes.example/");
            assert!(
                url.starts_with("https://hooks.owlshoes.example/tools/"),
                "unexpected URL: {url}"
            );
            assert!(!url.contains("//tools"), "double slash in URL: {url}");
        }
    }

    #[test]
    fn input_schemas_are_object_schemas() {
        for tool in tools() {
            let Some(schema) = tool.input_schema else {
                continue;
            };
            assert_eq!(schema["type"], "object", "tool: {}", tool.name);
            assert!(schema["properties"].is_object(), "tool: {}", tool.name);
            assert!(schema["required"].is_array(), "tool: {}", tool.name);
        }
    }

    #[test]
    fn write_tools_use_post() {
        for tool in tools() {
            if tool.name == "Return Order" || tool.name == "Place Order" {
                assert_eq!(tool.method, "POST");
            }
        }
    }
}
