//! Data Transfer Objects for the two DOKU API families.
//!
//! Both modules define an `InquiryRequest`/`InquiryResponse` pair, so they
//! are re-exported as modules rather than globbed.

pub mod disbursement;
pub mod repayment;
