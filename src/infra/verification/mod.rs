pub mod http_otp_gateway;
