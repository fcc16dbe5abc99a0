// GraphQL documents, one per operation. Operation names must match the
// `operationName` sent alongside them.

pub(crate) const QR_CODE_LOOKUP: &str = "query QrCodeLookup($code: String!) {
  qrCodeLookup(code: $code) {
    code
    status
    assignedBusinessName
  }
}";

pub(crate) const ASSIGN_QR_CODE: &str = "mutation AssignQrCodeToBusiness($input: AssignQrCodeInput!) {
  assignQrCodeToBusiness(input: $input) { id code status }
}";

pub(crate) const UNASSIGNED_QR_CODES: &str = "query UnassignedQrCodes($limit: Int) {
  unassignedQrCodes(limit: $limit) {
    id
    code
  }
}";

pub(crate) const CATEGORIES: &str = "query Categories { categories { id name } }";

pub(crate) const VERIFY_GSTIN: &str = "mutation VerifyGstin($input: VerifyGstinInput!) {
  verifyGstin(input: $input) {
    success
    business_id
    gstin
    businessName
    tradeName
    displayName
    category
    phoneNumber
    email
    address
    city
    state
    pincode
    errorMessage
    alreadyExists
  }
}";

pub(crate) const SUBMIT_BUSINESS_DETAILS: &str = "mutation SubmitBusinessDetails($input: SubmitBusinessDetailsInput!) {
  submitBusinessDetails(input: $input) {
    success
    message
  }
}";

pub(crate) const VERIFY_OTP: &str = "mutation VerifyOtp($business_id: String!, $phoneNumber: String!, $otp: String!) {
  verifyOtp(business_id: $business_id, phoneNumber: $phoneNumber, otp: $otp) {
    success
    message
  }
}";

pub(crate) const SEND_LOGIN_OTP: &str = "mutation SendLoginOtp($input: SendLoginInput!) {
  sendLoginOtp(input: $input) {
    success
    errorMessage
  }
}";

pub(crate) const VERIFY_LOGIN_OTP: &str = "mutation VerifyLoginOtp($input: VerifyLoginInput!) {
  verifyLoginOtp(input: $input) {
    verified
    token
    errorMessage
  }
}";

pub(crate) const AGENTS: &str = "query Agents { agents { id name phoneNumber email } }";

pub(crate) const CREATE_AGENT_USER: &str = "mutation CreateAgentUser($input: CreateAgentInput!) {
  createAgentUser(input: $input) { id }
}";

pub(crate) const DEACTIVATE_AGENT: &str = "mutation DeactivateAgent($agentId: String!) {
  deactivateAgent(agentId: $agentId) { id }
}";

pub(crate) const GENERATE_QR_CODE_BATCH: &str = "mutation GenerateQrCodeBatch($input: GenerateQrBatchInput!) {
  generateQrCodeBatch(input: $input) {
    batchMonth
    batchNumber
    items {
      dataUrl
      qrCode { id code batchMonth batchNumber batchSequence }
    }
  }
}";
