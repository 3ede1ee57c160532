//! Application constants
//!
//! Audit action tags are persisted in the audit log and matched by the
//! traceability timeline, so they are part of the stored vocabulary.

// Code prefixes
pub const QUOTE_CODE_PREFIX: &str = "COT";
pub const PRODUCTION_ID_PREFIX: &str = "OT";
pub const PURCHASE_ORDER_PREFIX: &str = "OC";
pub const GENERIC_SKU_PREFIX: &str = "GEN";
pub const AUTO_SKU_PLACEHOLDER: &str = "[Auto]";

// Production
pub const DEFAULT_PRESS_MACHINE: &str = "Offset-A";
pub const INVOICE_NUMBER_WIDTH: usize = 6;

// Listing limits
pub const AUDIT_HISTORY_LIMIT: usize = 200;
pub const AUDIT_MODULE_HISTORY_LIMIT: usize = 50;
pub const CLIENT_SEARCH_LIMIT: usize = 20;
pub const CLIENT_SUGGESTION_LIMIT: usize = 10;
pub const PRODUCTION_TREND_MONTHS: u32 = 4;

// Inventory thresholds
pub const NEAR_DEPLETION_FACTOR: f64 = 1.5;

/// Fallback actor email when no session is present
pub const SYSTEM_ACTOR: &str = "system";

/// Audit action tags
pub mod audit {
    pub const TASK_CLAIMED: &str = "TAREA_TOMADA";
    pub const TASK_CLAIMED_PRESS: &str = "TAREA_TOMADA_PRENSA";
    pub const TASK_CLAIMED_POST: &str = "TAREA_TOMADA_POST";
    pub const STEP_UPDATED: &str = "PASO_ACTUALIZADO";
    pub const CLIENT_APPROVAL: &str = "APROBACION_CLIENTE";
    pub const DESIGN_FINISHED: &str = "PASE_A_PRENSA";
    pub const PRINT_FINISHED: &str = "FIN_IMPRESION";
    pub const ORDER_COMPLETED: &str = "ORDEN_COMPLETADA";
    pub const PRESS_INCIDENT: &str = "INCIDENCIA_PRENSA";
    pub const INCIDENT: &str = "INCIDENCIA";
    pub const ORDER_ASSIGNED: &str = "OT_ASIGNADA";

    pub const QUOTE_CREATED: &str = "COTIZACION_CREADA";
    pub const ORDER_UPDATED: &str = "ORDEN_ACTUALIZADA";
    pub const QUOTE_CONVERTED: &str = "OT_GENERADA";
    pub const QUOTE_REJECTED: &str = "COTIZACION_RECHAZADA";
    pub const ORDER_CANCELLED: &str = "ORDEN_CANCELADA";
    pub const ORDER_DELETED: &str = "ORDEN_ELIMINADA";
    pub const INVOICE_GENERATED: &str = "FACTURA_GENERADA";

    pub const CLIENT_CREATED: &str = "CLIENTE_CREADO";
    pub const CLIENT_UPDATED: &str = "CLIENTE_ACTUALIZADO";
    pub const CLIENT_DELETED: &str = "CLIENTE_ELIMINADO";

    pub const USER_CREATED: &str = "USUARIO_CREADO";
    pub const USER_UPDATED: &str = "USUARIO_ACTUALIZADO";
    pub const USER_DELETED: &str = "USUARIO_ELIMINADO";

    pub const PROVIDER_CREATED: &str = "PROVEEDOR_CREADO";
    pub const PROVIDER_UPDATED: &str = "PROVEEDOR_ACTUALIZADO";
    pub const PROVIDER_DELETED: &str = "PROVEEDOR_ELIMINADO";

    pub const PRODUCT_CREATED: &str = "PRODUCTO_CREADO";
    pub const PRODUCT_UPDATED: &str = "PRODUCTO_ACTUALIZADO";
    pub const PRODUCT_DELETED: &str = "PRODUCTO_ELIMINADO";
    pub const PURCHASE_ORDER_CREATED: &str = "OC_CREADA";
    pub const PURCHASE_RECEIVED: &str = "RECEPCION_COMPRA";

    pub const SESSION_STARTED: &str = "INICIO_SESION";
    pub const SESSION_ENDED: &str = "CIERRE_SESION";
}
