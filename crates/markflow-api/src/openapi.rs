//! OpenAPI documentation
//!
//! Provides the OpenAPI 3.0 specification and Swagger UI for the Markflow API.

use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde_json::json;

/// Create OpenAPI routes
pub fn create_openapi_routes() -> Router {
    Router::new()
        .route("/openapi.json", get(openapi_json))
        .route("/docs", get(swagger_ui))
}

/// OpenAPI JSON specification endpoint
async fn openapi_json() -> impl IntoResponse {
    Json(get_openapi_spec())
}

/// Swagger UI HTML endpoint
async fn swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

/// Get the OpenAPI specification as JSON
fn get_openapi_spec() -> serde_json::Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Markflow API",
            "description": "REST API for Markflow, the marketing content hub: on-page SEO analysis and AI email template generation.",
            "version": "1.0.0",
            "license": {
                "name": "Apache-2.0",
                "url": "https://www.apache.org/licenses/LICENSE-2.0"
            }
        },
        "servers": [
            {
                "url": "/api/v1",
                "description": "API v1"
            }
        ],
        "tags": [
            {"name": "health", "description": "Health check endpoints"},
            {"name": "analyze", "description": "On-page SEO analysis"},
            {"name": "templates", "description": "Email template management"},
            {"name": "generate", "description": "AI template generation"}
        ],
        "paths": {
            "/analyze": {
                "post": {
                    "tags": ["analyze"],
                    "summary": "Analyze a page for on-page SEO facts",
                    "operationId": "analyze",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "required": ["url"],
                                    "properties": {"url": {"type": "string"}}
                                }
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Analysis report",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/AnalysisReport"}
                                }
                            }
                        },
                        "400": {"description": "Missing or empty URL"},
                        "502": {"description": "Upstream fetch failed"}
                    }
                }
            },
            "/clients/{clientId}/templates": {
                "get": {
                    "tags": ["templates"],
                    "summary": "List templates for a client, most recent first",
                    "operationId": "listTemplates",
                    "parameters": [
                        {"name": "clientId", "in": "path", "required": true, "schema": {"type": "string"}},
                        {"name": "limit", "in": "query", "schema": {"type": "integer", "default": 50}},
                        {"name": "offset", "in": "query", "schema": {"type": "integer", "default": 0}}
                    ],
                    "responses": {
                        "200": {
                            "description": "Template list",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/TemplateList"}
                                }
                            }
                        }
                    }
                },
                "post": {
                    "tags": ["templates"],
                    "summary": "Manually create a template",
                    "operationId": "createTemplate",
                    "parameters": [
                        {"name": "clientId", "in": "path", "required": true, "schema": {"type": "string"}}
                    ],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {"$ref": "#/components/schemas/CreateTemplateRequest"}
                            }
                        }
                    },
                    "responses": {
                        "201": {"description": "Template created"},
                        "400": {"description": "Validation error"}
                    }
                }
            },
            "/clients/{clientId}/templates/{id}": {
                "get": {
                    "tags": ["templates"],
                    "summary": "Get a single template",
                    "operationId": "getTemplate",
                    "parameters": [
                        {"name": "clientId", "in": "path", "required": true, "schema": {"type": "string"}},
                        {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}}
                    ],
                    "responses": {
                        "200": {"description": "Template"},
                        "404": {"description": "Template not found"}
                    }
                },
                "patch": {
                    "tags": ["templates"],
                    "summary": "Update a template; absent fields are left unchanged",
                    "operationId": "updateTemplate",
                    "parameters": [
                        {"name": "clientId", "in": "path", "required": true, "schema": {"type": "string"}},
                        {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}}
                    ],
                    "requestBody": {
                        "content": {
                            "application/json": {
                                "schema": {"$ref": "#/components/schemas/UpdateTemplateRequest"}
                            }
                        }
                    },
                    "responses": {
                        "200": {"description": "Updated template"},
                        "404": {"description": "Template not found"}
                    }
                },
                "delete": {
                    "tags": ["templates"],
                    "summary": "Delete a template",
                    "operationId": "deleteTemplate",
                    "parameters": [
                        {"name": "clientId", "in": "path", "required": true, "schema": {"type": "string"}},
                        {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}}
                    ],
                    "responses": {
                        "204": {"description": "Template deleted"},
                        "404": {"description": "Template not found"}
                    }
                }
            },
            "/clients/{clientId}/generate": {
                "post": {
                    "tags": ["generate"],
                    "summary": "Generate a batch of templates",
                    "operationId": "generateBatch",
                    "parameters": [
                        {"name": "clientId", "in": "path", "required": true, "schema": {"type": "string"}}
                    ],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {"$ref": "#/components/schemas/GenerateBatchRequest"}
                            }
                        }
                    },
                    "responses": {
                        "201": {"description": "Generated templates"},
                        "400": {"description": "Validation error"}
                    }
                }
            },
            "/clients/{clientId}/generate/custom": {
                "post": {
                    "tags": ["generate"],
                    "summary": "Enhance caller-supplied content into a polished template",
                    "operationId": "generateCustom",
                    "parameters": [
                        {"name": "clientId", "in": "path", "required": true, "schema": {"type": "string"}}
                    ],
                    "responses": {
                        "201": {"description": "Generated template"},
                        "400": {"description": "Validation error"}
                    }
                }
            },
            "/clients/{clientId}/generate/personal": {
                "post": {
                    "tags": ["generate"],
                    "summary": "Generate a short personal-sounding note",
                    "operationId": "generatePersonal",
                    "parameters": [
                        {"name": "clientId", "in": "path", "required": true, "schema": {"type": "string"}}
                    ],
                    "responses": {
                        "201": {"description": "Generated template"},
                        "400": {"description": "Validation error"}
                    }
                }
            },
            "/clients/{clientId}/templates/{id}/edit": {
                "post": {
                    "tags": ["generate"],
                    "summary": "AI-edit an existing template",
                    "operationId": "editTemplate",
                    "parameters": [
                        {"name": "clientId", "in": "path", "required": true, "schema": {"type": "string"}},
                        {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}}
                    ],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "required": ["instructions"],
                                    "properties": {"instructions": {"type": "string"}}
                                }
                            }
                        }
                    },
                    "responses": {
                        "200": {"description": "Edited template"},
                        "404": {"description": "Template not found"}
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "AnalysisReport": {
                    "type": "object",
                    "properties": {
                        "metadata": {
                            "type": "object",
                            "properties": {
                                "title": {"type": "string"},
                                "description": {"type": "string"},
                                "keywords": {"type": "string"},
                                "canonical": {"type": "string"},
                                "robots": {"type": "string"},
                                "viewport": {"type": "string"}
                            }
                        },
                        "headings": {
                            "type": "object",
                            "properties": {
                                "h1": {"type": "array", "items": {"type": "string"}},
                                "h2": {"type": "array", "items": {"type": "string"}},
                                "h3": {"type": "array", "items": {"type": "string"}}
                            }
                        },
                        "links": {
                            "type": "object",
                            "properties": {
                                "internal": {"type": "array", "items": {"type": "string"}},
                                "external": {"type": "array", "items": {"type": "string"}},
                                "internalCount": {"type": "integer"},
                                "externalCount": {"type": "integer"}
                            }
                        },
                        "images": {
                            "type": "object",
                            "properties": {
                                "total": {"type": "integer"},
                                "withAlt": {"type": "integer"},
                                "withoutAlt": {"type": "integer"}
                            }
                        },
                        "socialMedia": {"type": "object"},
                        "structuredData": {
                            "type": "object",
                            "properties": {
                                "present": {"type": "boolean"},
                                "blocks": {"type": "array", "items": {"type": "string"}}
                            }
                        }
                    }
                },
                "Template": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "string"},
                        "client_id": {"type": "string"},
                        "title": {"type": "string"},
                        "subject": {"type": "string"},
                        "content": {"type": "string"},
                        "status": {"type": "string", "enum": ["draft", "approved", "sent", "scheduled"]},
                        "scheduled_for": {"type": "string", "format": "date-time", "nullable": true},
                        "tags": {"type": "array", "items": {"type": "string"}},
                        "metrics": {
                            "type": "object",
                            "properties": {
                                "opens": {"type": "integer"},
                                "clicks": {"type": "integer"},
                                "conversions": {"type": "integer"}
                            }
                        },
                        "created_at": {"type": "string", "format": "date-time"}
                    }
                },
                "TemplateList": {
                    "type": "object",
                    "properties": {
                        "data": {"type": "array", "items": {"$ref": "#/components/schemas/Template"}},
                        "total": {"type": "integer"},
                        "limit": {"type": "integer"},
                        "offset": {"type": "integer"}
                    }
                },
                "CreateTemplateRequest": {
                    "type": "object",
                    "required": ["title", "subject", "content"],
                    "properties": {
                        "title": {"type": "string"},
                        "subject": {"type": "string"},
                        "content": {"type": "string"},
                        "tags": {"type": "array", "items": {"type": "string"}}
                    }
                },
                "UpdateTemplateRequest": {
                    "type": "object",
                    "properties": {
                        "title": {"type": "string"},
                        "subject": {"type": "string"},
                        "content": {"type": "string"},
                        "status": {"type": "string", "enum": ["draft", "approved", "sent", "scheduled"]},
                        "scheduled_for": {"type": "string", "format": "date-time"},
                        "tags": {"type": "array", "items": {"type": "string"}}
                    }
                },
                "GenerateBatchRequest": {
                    "type": "object",
                    "required": ["client_name", "purpose"],
                    "properties": {
                        "client_name": {"type": "string"},
                        "industry": {"type": "string"},
                        "purpose": {"type": "string"},
                        "tone": {"type": "string", "default": "professional"},
                        "promotion": {"type": "object", "nullable": true},
                        "product_highlight": {"type": "object", "nullable": true},
                        "additional_instructions": {"type": "string"},
                        "brand_colors": {"type": "object", "nullable": true},
                        "template_kind": {
                            "type": "string",
                            "enum": ["simple", "newsletter", "promotional", "welcome", "announcement", "personal-touch"]
                        },
                        "count": {"type": "integer", "default": 3},
                        "theme": {"type": "string", "nullable": true}
                    }
                }
            }
        }
    })
}

/// Swagger UI HTML template
const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Markflow API Documentation</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui.css" />
    <style>
        body { margin: 0; padding: 0; }
        .swagger-ui .topbar { display: none; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            SwaggerUIBundle({
                url: "/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIBundle.SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>"#;
