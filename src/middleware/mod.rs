/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth (bearer token), http (request id / trace / limits / timeout)
 */
pub mod auth;
pub mod http;
